use async_trait::async_trait;
use crate::core::command::{Command, CommandError};
use crate::core::session::SessionContext;
use crate::loans::domain::LoanService;
use crate::loans::domain::lifecycle::DashboardView;

pub struct DashboardCommand {
    loan_service: Box<dyn LoanService>,
}

impl DashboardCommand {
    pub fn new(loan_service: Box<dyn LoanService>) -> Self {
        Self {
            loan_service,
        }
    }
}

#[derive(Debug)]
pub struct DashboardCommandRequest {
    ctx: SessionContext,
}

impl DashboardCommandRequest {
    pub fn new(ctx: SessionContext) -> Self {
        Self {
            ctx,
        }
    }
}

// the dashboard counts are returned as they are
pub type DashboardCommandResponse = DashboardView;

#[async_trait]
impl Command<DashboardCommandRequest, DashboardCommandResponse> for DashboardCommand {
    async fn execute(&self, req: DashboardCommandRequest) -> Result<DashboardCommandResponse, CommandError> {
        self.loan_service.dashboard(&req.ctx).await.map_err(CommandError::from)
    }
}
