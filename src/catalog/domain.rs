pub mod service;

use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::copies::domain::model::CopyEntity;
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::core::listing::ListQuery;
use crate::core::session::SessionContext;

#[async_trait]
pub trait CatalogService: Sync + Send {
    async fn list_books(&self, ctx: &SessionContext, query: &ListQuery) -> LibraryResult<PaginatedResult<BookEntity>>;
    async fn categories(&self, ctx: &SessionContext) -> LibraryResult<Vec<String>>;
    async fn add_book(&self, ctx: &SessionContext, book: &BookEntity) -> LibraryResult<BookEntity>;
    async fn update_book(&self, ctx: &SessionContext, book: &BookEntity) -> LibraryResult<BookEntity>;
    async fn remove_book(&self, ctx: &SessionContext, id: &str) -> LibraryResult<()>;
    async fn list_copies(&self, ctx: &SessionContext, query: &ListQuery) -> LibraryResult<PaginatedResult<CopyEntity>>;
    async fn available_copies(&self, ctx: &SessionContext, search: Option<&str>) -> LibraryResult<Vec<CopyEntity>>;
    async fn add_copy(&self, ctx: &SessionContext, copy: &CopyEntity) -> LibraryResult<CopyEntity>;
    async fn update_copy(&self, ctx: &SessionContext, copy: &CopyEntity) -> LibraryResult<CopyEntity>;
    async fn remove_copy(&self, ctx: &SessionContext, id: &str) -> LibraryResult<()>;
}
