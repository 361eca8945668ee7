use async_trait::async_trait;
use serde::Serialize;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::copies::domain::model::CopyEntity;
use crate::core::session::SessionContext;

pub struct UpdateCopyCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl UpdateCopyCommand {
    pub fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub struct UpdateCopyCommandRequest {
    ctx: SessionContext,
    copy: CopyEntity,
}

impl UpdateCopyCommandRequest {
    pub fn new(ctx: SessionContext, copy_id: &str, copy: CopyEntity) -> Self {
        Self {
            ctx,
            copy: copy.with_id(copy_id),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateCopyCommandResponse {
    pub copy: CopyEntity,
}

impl UpdateCopyCommandResponse {
    pub fn new(copy: CopyEntity) -> Self {
        Self {
            copy,
        }
    }
}

#[async_trait]
impl Command<UpdateCopyCommandRequest, UpdateCopyCommandResponse> for UpdateCopyCommand {
    async fn execute(&self, req: UpdateCopyCommandRequest) -> Result<UpdateCopyCommandResponse, CommandError> {
        self.catalog_service.update_copy(&req.ctx, &req.copy)
            .await.map_err(CommandError::from).map(UpdateCopyCommandResponse::new)
    }
}
