use async_trait::async_trait;
use serde::Serialize;
use crate::core::command::{Command, CommandError};
use crate::core::session::SessionContext;
use crate::loans::domain::LoanService;
use crate::loans::domain::lifecycle::InvariantViolation;

pub struct AuditLoansCommand {
    loan_service: Box<dyn LoanService>,
}

impl AuditLoansCommand {
    pub fn new(loan_service: Box<dyn LoanService>) -> Self {
        Self {
            loan_service,
        }
    }
}

#[derive(Debug)]
pub struct AuditLoansCommandRequest {
    ctx: SessionContext,
}

impl AuditLoansCommandRequest {
    pub fn new(ctx: SessionContext) -> Self {
        Self {
            ctx,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuditLoansCommandResponse {
    pub consistent: bool,
    pub violations: Vec<InvariantViolation>,
}

impl AuditLoansCommandResponse {
    pub fn new(violations: Vec<InvariantViolation>) -> Self {
        Self {
            consistent: violations.is_empty(),
            violations,
        }
    }
}

#[async_trait]
impl Command<AuditLoansCommandRequest, AuditLoansCommandResponse> for AuditLoansCommand {
    async fn execute(&self, req: AuditLoansCommandRequest) -> Result<AuditLoansCommandResponse, CommandError> {
        self.loan_service.audit(&req.ctx)
            .await.map_err(CommandError::from).map(AuditLoansCommandResponse::new)
    }
}
