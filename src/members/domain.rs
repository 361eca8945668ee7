pub mod model;
pub mod service;

use async_trait::async_trait;
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::core::listing::ListQuery;
use crate::core::session::SessionContext;
use crate::members::domain::model::MemberEntity;

#[async_trait]
pub trait MemberService: Sync + Send {
    async fn list_members(&self, ctx: &SessionContext, query: &ListQuery) -> LibraryResult<PaginatedResult<MemberEntity>>;
    async fn add_member(&self, ctx: &SessionContext, member: &MemberEntity) -> LibraryResult<MemberEntity>;
    async fn update_member(&self, ctx: &SessionContext, member: &MemberEntity) -> LibraryResult<MemberEntity>;
    async fn remove_member(&self, ctx: &SessionContext, id: &str) -> LibraryResult<()>;
}
