use async_trait::async_trait;
use serde::Serialize;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::copies::domain::model::CopyEntity;
use crate::core::library::PaginatedResult;
use crate::core::listing::ListQuery;
use crate::core::session::SessionContext;

pub struct ListCopiesCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl ListCopiesCommand {
    pub fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub struct ListCopiesCommandRequest {
    ctx: SessionContext,
    query: ListQuery,
}

impl ListCopiesCommandRequest {
    pub fn new(ctx: SessionContext, query: ListQuery) -> Self {
        Self {
            ctx,
            query,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListCopiesCommandResponse {
    pub copies: PaginatedResult<CopyEntity>,
}

impl ListCopiesCommandResponse {
    pub fn new(copies: PaginatedResult<CopyEntity>) -> Self {
        Self {
            copies,
        }
    }
}

#[async_trait]
impl Command<ListCopiesCommandRequest, ListCopiesCommandResponse> for ListCopiesCommand {
    async fn execute(&self, req: ListCopiesCommandRequest) -> Result<ListCopiesCommandResponse, CommandError> {
        self.catalog_service.list_copies(&req.ctx, &req.query)
            .await.map_err(CommandError::from).map(ListCopiesCommandResponse::new)
    }
}
