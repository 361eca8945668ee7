use async_trait::async_trait;
use serde::Serialize;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::books::domain::model::BookEntity;
use crate::core::library::PaginatedResult;
use crate::core::listing::ListQuery;
use crate::core::session::SessionContext;

pub struct ListBooksCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl ListBooksCommand {
    pub fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub struct ListBooksCommandRequest {
    ctx: SessionContext,
    query: ListQuery,
}

impl ListBooksCommandRequest {
    pub fn new(ctx: SessionContext, query: ListQuery) -> Self {
        Self {
            ctx,
            query,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListBooksCommandResponse {
    pub books: PaginatedResult<BookEntity>,
}

impl ListBooksCommandResponse {
    pub fn new(books: PaginatedResult<BookEntity>) -> Self {
        Self {
            books,
        }
    }
}

#[async_trait]
impl Command<ListBooksCommandRequest, ListBooksCommandResponse> for ListBooksCommand {
    async fn execute(&self, req: ListBooksCommandRequest) -> Result<ListBooksCommandResponse, CommandError> {
        self.catalog_service.list_books(&req.ctx, &req.query)
            .await.map_err(CommandError::from).map(ListBooksCommandResponse::new)
    }
}
