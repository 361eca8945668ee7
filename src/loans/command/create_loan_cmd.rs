use async_trait::async_trait;
use serde::Serialize;
use crate::core::command::{Command, CommandError};
use crate::core::session::SessionContext;
use crate::loans::domain::LoanService;
use crate::loans::domain::lifecycle::{LoanView, NewLoan};

pub struct CreateLoanCommand {
    loan_service: Box<dyn LoanService>,
}

impl CreateLoanCommand {
    pub fn new(loan_service: Box<dyn LoanService>) -> Self {
        Self {
            loan_service,
        }
    }
}

#[derive(Debug)]
pub struct CreateLoanCommandRequest {
    ctx: SessionContext,
    loan: NewLoan,
}

impl CreateLoanCommandRequest {
    pub fn new(ctx: SessionContext, loan: NewLoan) -> Self {
        Self {
            ctx,
            loan,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateLoanCommandResponse {
    pub loan: LoanView,
}

impl CreateLoanCommandResponse {
    pub fn new(loan: LoanView) -> Self {
        Self {
            loan,
        }
    }
}

#[async_trait]
impl Command<CreateLoanCommandRequest, CreateLoanCommandResponse> for CreateLoanCommand {
    async fn execute(&self, req: CreateLoanCommandRequest) -> Result<CreateLoanCommandResponse, CommandError> {
        self.loan_service.create_loan(&req.ctx, &req.loan)
            .await.map_err(CommandError::from).map(CreateLoanCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use chrono::Duration;
    use lazy_static::lazy_static;
    use crate::copies::domain::model::CopyEntity;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::library::CopyStatus;
    use crate::core::session::SessionContext;
    use crate::gateway::factory::memory_handles;
    use crate::gateway::memory::MemoryCatalog;
    use crate::loans::command::create_loan_cmd::{CreateLoanCommand, CreateLoanCommandRequest};
    use crate::loans::domain::lifecycle::NewLoan;
    use crate::loans::factory;
    use crate::members::domain::model::MemberEntity;
    use crate::utils::date::today;

    lazy_static! {
        static ref SUT_CMD: AsyncOnce<CreateLoanCommand> = AsyncOnce::new(async {
                let catalog = MemoryCatalog::new();
                catalog.seed(vec![],
                             vec![CopyEntity::new("B1", None, CopyStatus::Available).with_id("C1")],
                             vec![MemberEntity::new("Alice", None).with_id("M1")],
                             vec![]).unwrap();
                let svc = factory::create_loan_service(&Configuration::new("test"), &memory_handles(catalog));
                CreateLoanCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_create_loan() {
        let cmd = SUT_CMD.get().await;
        let ctx = SessionContext::new("token", "U1");

        let err = cmd.execute(CreateLoanCommandRequest::new(
            ctx.clone(), NewLoan::new("M1", &[], today(), today()))).await.unwrap_err();
        assert!(matches!(err, CommandError::Validation { .. }));

        let res = cmd.execute(CreateLoanCommandRequest::new(
            ctx, NewLoan::new("M1", &["C1"], today(), today() + Duration::days(7))))
            .await.expect("should create loan");
        assert_eq!("M1", res.loan.loan.member.id.as_str());
    }
}
