use async_trait::async_trait;
use serde::Serialize;
use crate::core::command::{Command, CommandError};
use crate::core::library::PaginatedResult;
use crate::core::listing::ListQuery;
use crate::core::session::SessionContext;
use crate::loans::domain::LoanService;
use crate::loans::domain::lifecycle::MemberLoanRow;

pub struct MemberLoansCommand {
    loan_service: Box<dyn LoanService>,
}

impl MemberLoansCommand {
    pub fn new(loan_service: Box<dyn LoanService>) -> Self {
        Self {
            loan_service,
        }
    }
}

#[derive(Debug)]
pub struct MemberLoansCommandRequest {
    ctx: SessionContext,
    query: ListQuery,
}

impl MemberLoansCommandRequest {
    pub fn new(ctx: SessionContext, query: ListQuery) -> Self {
        Self {
            ctx,
            query,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MemberLoansCommandResponse {
    pub members: PaginatedResult<MemberLoanRow>,
}

impl MemberLoansCommandResponse {
    pub fn new(members: PaginatedResult<MemberLoanRow>) -> Self {
        Self {
            members,
        }
    }
}

#[async_trait]
impl Command<MemberLoansCommandRequest, MemberLoansCommandResponse> for MemberLoansCommand {
    async fn execute(&self, req: MemberLoansCommandRequest) -> Result<MemberLoansCommandResponse, CommandError> {
        self.loan_service.member_loans(&req.ctx, &req.query)
            .await.map_err(CommandError::from).map(MemberLoansCommandResponse::new)
    }
}
