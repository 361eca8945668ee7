use async_trait::async_trait;
use serde::Serialize;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::copies::domain::model::CopyEntity;
use crate::core::session::SessionContext;

// Copies the new-loan form may pick from
pub struct AvailableCopiesCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl AvailableCopiesCommand {
    pub fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub struct AvailableCopiesCommandRequest {
    ctx: SessionContext,
    search: Option<String>,
}

impl AvailableCopiesCommandRequest {
    pub fn new(ctx: SessionContext, search: Option<String>) -> Self {
        Self {
            ctx,
            search,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AvailableCopiesCommandResponse {
    pub copies: Vec<CopyEntity>,
}

impl AvailableCopiesCommandResponse {
    pub fn new(copies: Vec<CopyEntity>) -> Self {
        Self {
            copies,
        }
    }
}

#[async_trait]
impl Command<AvailableCopiesCommandRequest, AvailableCopiesCommandResponse> for AvailableCopiesCommand {
    async fn execute(&self, req: AvailableCopiesCommandRequest) -> Result<AvailableCopiesCommandResponse, CommandError> {
        self.catalog_service.available_copies(&req.ctx, req.search.as_deref())
            .await.map_err(CommandError::from).map(AvailableCopiesCommandResponse::new)
    }
}
