use async_trait::async_trait;
use serde::Serialize;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::copies::domain::model::CopyEntity;
use crate::core::session::SessionContext;

pub struct AddCopyCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl AddCopyCommand {
    pub fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub struct AddCopyCommandRequest {
    ctx: SessionContext,
    copy: CopyEntity,
}

impl AddCopyCommandRequest {
    pub fn new(ctx: SessionContext, copy: CopyEntity) -> Self {
        Self {
            ctx,
            copy,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddCopyCommandResponse {
    pub copy: CopyEntity,
}

impl AddCopyCommandResponse {
    pub fn new(copy: CopyEntity) -> Self {
        Self {
            copy,
        }
    }
}

#[async_trait]
impl Command<AddCopyCommandRequest, AddCopyCommandResponse> for AddCopyCommand {
    async fn execute(&self, req: AddCopyCommandRequest) -> Result<AddCopyCommandResponse, CommandError> {
        self.catalog_service.add_copy(&req.ctx, &req.copy)
            .await.map_err(CommandError::from).map(AddCopyCommandResponse::new)
    }
}
