use async_trait::async_trait;
use serde::Serialize;
use crate::core::command::{Command, CommandError};
use crate::core::session::SessionContext;
use crate::loans::domain::LoanService;
use crate::loans::domain::lifecycle::LoanView;

pub struct ReturnLoanCommand {
    loan_service: Box<dyn LoanService>,
}

impl ReturnLoanCommand {
    pub fn new(loan_service: Box<dyn LoanService>) -> Self {
        Self {
            loan_service,
        }
    }
}

#[derive(Debug)]
pub struct ReturnLoanCommandRequest {
    ctx: SessionContext,
    loan_id: String,
}

impl ReturnLoanCommandRequest {
    pub fn new(ctx: SessionContext, loan_id: &str) -> Self {
        Self {
            ctx,
            loan_id: loan_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReturnLoanCommandResponse {
    pub loan: LoanView,
}

impl ReturnLoanCommandResponse {
    pub fn new(loan: LoanView) -> Self {
        Self {
            loan,
        }
    }
}

#[async_trait]
impl Command<ReturnLoanCommandRequest, ReturnLoanCommandResponse> for ReturnLoanCommand {
    async fn execute(&self, req: ReturnLoanCommandRequest) -> Result<ReturnLoanCommandResponse, CommandError> {
        self.loan_service.mark_returned(&req.ctx, req.loan_id.as_str())
            .await.map_err(CommandError::from).map(ReturnLoanCommandResponse::new)
    }
}
