use async_trait::async_trait;
use serde::Serialize;
use crate::core::command::{Command, CommandError};
use crate::core::session::SessionContext;
use crate::loans::domain::LoanService;
use crate::loans::domain::lifecycle::LoanView;

// Loans of a single member, for the member detail screen
pub struct MemberHistoryCommand {
    loan_service: Box<dyn LoanService>,
}

impl MemberHistoryCommand {
    pub fn new(loan_service: Box<dyn LoanService>) -> Self {
        Self {
            loan_service,
        }
    }
}

#[derive(Debug)]
pub struct MemberHistoryCommandRequest {
    ctx: SessionContext,
    member_id: String,
}

impl MemberHistoryCommandRequest {
    pub fn new(ctx: SessionContext, member_id: &str) -> Self {
        Self {
            ctx,
            member_id: member_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MemberHistoryCommandResponse {
    pub loans: Vec<LoanView>,
}

impl MemberHistoryCommandResponse {
    pub fn new(loans: Vec<LoanView>) -> Self {
        Self {
            loans,
        }
    }
}

#[async_trait]
impl Command<MemberHistoryCommandRequest, MemberHistoryCommandResponse> for MemberHistoryCommand {
    async fn execute(&self, req: MemberHistoryCommandRequest) -> Result<MemberHistoryCommandResponse, CommandError> {
        self.loan_service.loans_of_member(&req.ctx, req.member_id.as_str())
            .await.map_err(CommandError::from).map(MemberHistoryCommandResponse::new)
    }
}
