use async_trait::async_trait;
use serde::Serialize;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::session::SessionContext;

pub struct RemoveCopyCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl RemoveCopyCommand {
    pub fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub struct RemoveCopyCommandRequest {
    ctx: SessionContext,
    copy_id: String,
}

impl RemoveCopyCommandRequest {
    pub fn new(ctx: SessionContext, copy_id: &str) -> Self {
        Self {
            ctx,
            copy_id: copy_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RemoveCopyCommandResponse {
    pub copy_id: String,
}

impl RemoveCopyCommandResponse {
    pub fn new(copy_id: String) -> Self {
        Self {
            copy_id,
        }
    }
}

#[async_trait]
impl Command<RemoveCopyCommandRequest, RemoveCopyCommandResponse> for RemoveCopyCommand {
    async fn execute(&self, req: RemoveCopyCommandRequest) -> Result<RemoveCopyCommandResponse, CommandError> {
        self.catalog_service.remove_copy(&req.ctx, req.copy_id.as_str())
            .await.map_err(CommandError::from).map(|_| RemoveCopyCommandResponse::new(req.copy_id))
    }
}
