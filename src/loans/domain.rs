pub mod lifecycle;
pub mod model;
pub mod service;

use async_trait::async_trait;
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::core::listing::ListQuery;
use crate::core::session::SessionContext;
use crate::loans::domain::lifecycle::{DashboardView, InvariantViolation, LoanView, MemberLoanRow, NewLoan};

#[async_trait]
pub trait LoanService: Sync + Send {
    async fn create_loan(&self, ctx: &SessionContext, req: &NewLoan) -> LibraryResult<LoanView>;
    async fn mark_returned(&self, ctx: &SessionContext, id: &str) -> LibraryResult<LoanView>;
    async fn list_loans(&self, ctx: &SessionContext, query: &ListQuery) -> LibraryResult<PaginatedResult<LoanView>>;
    async fn member_loans(&self, ctx: &SessionContext, query: &ListQuery) -> LibraryResult<PaginatedResult<MemberLoanRow>>;
    async fn loans_of_member(&self, ctx: &SessionContext, member_id: &str) -> LibraryResult<Vec<LoanView>>;
    async fn dashboard(&self, ctx: &SessionContext) -> LibraryResult<DashboardView>;
    async fn audit(&self, ctx: &SessionContext) -> LibraryResult<Vec<InvariantViolation>>;
}
