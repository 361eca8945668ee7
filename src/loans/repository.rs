use async_trait::async_trait;
use crate::core::library::{LibraryResult, LoanStatus};
use crate::core::repository::Repository;
use crate::core::session::SessionContext;
use crate::loans::domain::model::LoanEntity;

#[async_trait]
pub trait LoanRepository: Repository<LoanEntity> {
    // the only mutation a stored loan accepts
    async fn change_status(&self, ctx: &SessionContext, id: &str, status: LoanStatus) -> LibraryResult<LoanEntity>;
}
