use async_trait::async_trait;
use serde::Serialize;
use crate::core::command::{Command, CommandError};
use crate::core::library::PaginatedResult;
use crate::core::listing::ListQuery;
use crate::core::session::SessionContext;
use crate::loans::domain::LoanService;
use crate::loans::domain::lifecycle::LoanView;

pub struct ListLoansCommand {
    loan_service: Box<dyn LoanService>,
}

impl ListLoansCommand {
    pub fn new(loan_service: Box<dyn LoanService>) -> Self {
        Self {
            loan_service,
        }
    }
}

#[derive(Debug)]
pub struct ListLoansCommandRequest {
    ctx: SessionContext,
    query: ListQuery,
}

impl ListLoansCommandRequest {
    pub fn new(ctx: SessionContext, query: ListQuery) -> Self {
        Self {
            ctx,
            query,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListLoansCommandResponse {
    pub loans: PaginatedResult<LoanView>,
}

impl ListLoansCommandResponse {
    pub fn new(loans: PaginatedResult<LoanView>) -> Self {
        Self {
            loans,
        }
    }
}

#[async_trait]
impl Command<ListLoansCommandRequest, ListLoansCommandResponse> for ListLoansCommand {
    async fn execute(&self, req: ListLoansCommandRequest) -> Result<ListLoansCommandResponse, CommandError> {
        self.loan_service.list_loans(&req.ctx, &req.query)
            .await.map_err(CommandError::from).map(ListLoansCommandResponse::new)
    }
}
