use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde_json::Value;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::core::listing::ListQuery;
use crate::core::session::SessionContext;
use crate::loans::command::audit_loans_cmd::{AuditLoansCommand, AuditLoansCommandRequest, AuditLoansCommandResponse};
use crate::loans::command::create_loan_cmd::{CreateLoanCommand, CreateLoanCommandRequest, CreateLoanCommandResponse};
use crate::loans::command::dashboard_cmd::{DashboardCommand, DashboardCommandRequest, DashboardCommandResponse};
use crate::loans::command::list_loans_cmd::{ListLoansCommand, ListLoansCommandRequest, ListLoansCommandResponse};
use crate::loans::command::member_history_cmd::{MemberHistoryCommand, MemberHistoryCommandRequest, MemberHistoryCommandResponse};
use crate::loans::command::member_loans_cmd::{MemberLoansCommand, MemberLoansCommandRequest, MemberLoansCommandResponse};
use crate::loans::command::return_loan_cmd::{ReturnLoanCommand, ReturnLoanCommandRequest, ReturnLoanCommandResponse};
use crate::loans::domain::LoanService;
use crate::loans::domain::lifecycle::NewLoan;
use crate::loans::factory;

fn build_service(state: &AppState) -> Box<dyn LoanService> {
    factory::create_loan_service(&state.config, &state.handles)
}

pub async fn dashboard(
    State(state): State<AppState>,
    ctx: SessionContext) -> Result<Json<DashboardCommandResponse>, ServerError> {
    let res = DashboardCommand::new(build_service(&state)).execute(DashboardCommandRequest::new(ctx)).await?;
    Ok(Json(res))
}

pub async fn list_loans(
    State(state): State<AppState>,
    ctx: SessionContext,
    Query(query): Query<ListQuery>) -> Result<Json<ListLoansCommandResponse>, ServerError> {
    let req = ListLoansCommandRequest::new(ctx, query);
    let res = ListLoansCommand::new(build_service(&state)).execute(req).await?;
    Ok(Json(res))
}

pub async fn create_loan(
    State(state): State<AppState>,
    ctx: SessionContext,
    json: Json<Value>) -> Result<Json<CreateLoanCommandResponse>, ServerError> {
    let loan: NewLoan = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = CreateLoanCommand::new(build_service(&state))
        .execute(CreateLoanCommandRequest::new(ctx, loan)).await?;
    Ok(Json(res))
}

pub async fn member_loans(
    State(state): State<AppState>,
    ctx: SessionContext,
    Query(query): Query<ListQuery>) -> Result<Json<MemberLoansCommandResponse>, ServerError> {
    let req = MemberLoansCommandRequest::new(ctx, query);
    let res = MemberLoansCommand::new(build_service(&state)).execute(req).await?;
    Ok(Json(res))
}

pub async fn member_history(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(member_id): Path<String>) -> Result<Json<MemberHistoryCommandResponse>, ServerError> {
    let req = MemberHistoryCommandRequest::new(ctx, member_id.as_str());
    let res = MemberHistoryCommand::new(build_service(&state)).execute(req).await?;
    Ok(Json(res))
}

pub async fn audit_loans(
    State(state): State<AppState>,
    ctx: SessionContext) -> Result<Json<AuditLoansCommandResponse>, ServerError> {
    let res = AuditLoansCommand::new(build_service(&state)).execute(AuditLoansCommandRequest::new(ctx)).await?;
    Ok(Json(res))
}

pub async fn return_loan(
    State(state): State<AppState>,
    ctx: SessionContext,
    Path(loan_id): Path<String>) -> Result<Json<ReturnLoanCommandResponse>, ServerError> {
    let req = ReturnLoanCommandRequest::new(ctx, loan_id.as_str());
    let res = ReturnLoanCommand::new(build_service(&state)).execute(req).await?;
    Ok(Json(res))
}
