use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde_json::Value;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::core::listing::ListQuery;
use crate::core::session::SessionContext;
use crate::members::command::add_member_cmd::{AddMemberCommand, AddMemberCommandRequest, AddMemberCommandResponse};
use crate::members::command::list_members_cmd::{ListMembersCommand, ListMembersCommandRequest, ListMembersCommandResponse};
use crate::members::command::remove_member_cmd::{RemoveMemberCommand, RemoveMemberCommandRequest, RemoveMemberCommandResponse};
use crate::members::command::update_member_cmd::{UpdateMemberCommand, UpdateMemberCommandRequest, UpdateMemberCommandResponse};
use crate::members::domain::MemberService;
use crate::members::domain::model::MemberEntity;
use crate::members::factory;

fn build_service(state: &AppState) -> Box<dyn MemberService> {
    factory::create_member_service(&state.config, &state.handles)
}

pub async fn list_members(
    State(state): State<AppState>,
    ctx: SessionContext,
    Query(query): Query<ListQuery>) -> Result<Json<ListMembersCommandResponse>, ServerError> {
    let req = ListMembersCommandRequest::new(ctx, query);
    let res = ListMembersCommand::new(build_service(&state)).execute(req).await?;
    Ok(Json(res))
}

pub async fn add_member(
    State(state): State<AppState>,
    ctx: SessionContext,
    json: Json<Value>) -> Result<Json<AddMemberCommandResponse>, ServerError> {
    let member: MemberEntity = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = AddMemberCommand::new(build_service(&state)).execute(AddMemberCommandRequest::new(ctx, member)).await?;
    Ok(Json(res))
}

pub async fn update_member(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(member_id): Path<String>,
    json: Json<Value>) -> Result<Json<UpdateMemberCommandResponse>, ServerError> {
    let member: MemberEntity = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let req = UpdateMemberCommandRequest::new(ctx, member_id.as_str(), member);
    let res = UpdateMemberCommand::new(build_service(&state)).execute(req).await?;
    Ok(Json(res))
}

pub async fn remove_member(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(member_id): Path<String>) -> Result<Json<RemoveMemberCommandResponse>, ServerError> {
    let req = RemoveMemberCommandRequest::new(ctx, member_id.as_str());
    let res = RemoveMemberCommand::new(build_service(&state)).execute(req).await?;
    Ok(Json(res))
}
