use axum::{
    extract::State,
    response::Json,
};
use serde_json::Value;
use crate::auth::command::delete_account_cmd::{DeleteAccountCommand, DeleteAccountCommandRequest, DeleteAccountCommandResponse};
use crate::auth::command::login_cmd::{LoginCommand, LoginCommandRequest, LoginCommandResponse};
use crate::auth::command::register_cmd::{RegisterCommand, RegisterCommandRequest, RegisterCommandResponse};
use crate::auth::command::update_profile_cmd::{UpdateProfileCommand, UpdateProfileCommandRequest, UpdateProfileCommandResponse};
use crate::auth::domain::AuthService;
use crate::auth::dto::{Registration, UserProfile};
use crate::auth::factory;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::core::session::SessionContext;

fn build_service(state: &AppState) -> Box<dyn AuthService> {
    factory::create_auth_service(&state.config, &state.handles)
}

pub async fn login(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<LoginCommandResponse>, ServerError> {
    let req: LoginCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = LoginCommand::new(build_service(&state)).execute(req).await?;
    Ok(Json(res))
}

pub async fn register(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<RegisterCommandResponse>, ServerError> {
    let registration: Registration = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = RegisterCommand::new(build_service(&state)).execute(RegisterCommandRequest::new(registration)).await?;
    Ok(Json(res))
}

pub async fn update_profile(
    State(state): State<AppState>,
    ctx: SessionContext,
    json: Json<Value>) -> Result<Json<UpdateProfileCommandResponse>, ServerError> {
    let profile: UserProfile = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let req = UpdateProfileCommandRequest::new(ctx, profile);
    let res = UpdateProfileCommand::new(build_service(&state)).execute(req).await?;
    Ok(Json(res))
}

pub async fn delete_account(
    State(state): State<AppState>,
    ctx: SessionContext) -> Result<Json<DeleteAccountCommandResponse>, ServerError> {
    let res = DeleteAccountCommand::new(build_service(&state)).execute(DeleteAccountCommandRequest::new(ctx)).await?;
    Ok(Json(res))
}
