use async_trait::async_trait;
use serde::Serialize;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::session::SessionContext;

// Categories offered by the book filter
pub struct BookCategoriesCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl BookCategoriesCommand {
    pub fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub struct BookCategoriesCommandRequest {
    ctx: SessionContext,
}

impl BookCategoriesCommandRequest {
    pub fn new(ctx: SessionContext) -> Self {
        Self {
            ctx,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookCategoriesCommandResponse {
    pub categories: Vec<String>,
}

impl BookCategoriesCommandResponse {
    pub fn new(categories: Vec<String>) -> Self {
        Self {
            categories,
        }
    }
}

#[async_trait]
impl Command<BookCategoriesCommandRequest, BookCategoriesCommandResponse> for BookCategoriesCommand {
    async fn execute(&self, req: BookCategoriesCommandRequest) -> Result<BookCategoriesCommandResponse, CommandError> {
        self.catalog_service.categories(&req.ctx)
            .await.map_err(CommandError::from).map(BookCategoriesCommandResponse::new)
    }
}
