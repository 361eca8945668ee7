use async_trait::async_trait;
use serde::Serialize;
use crate::auth::domain::AuthService;
use crate::core::command::{Command, CommandError};
use crate::core::session::SessionContext;

pub struct DeleteAccountCommand {
    auth_service: Box<dyn AuthService>,
}

impl DeleteAccountCommand {
    pub fn new(auth_service: Box<dyn AuthService>) -> Self {
        Self {
            auth_service,
        }
    }
}

#[derive(Debug)]
pub struct DeleteAccountCommandRequest {
    ctx: SessionContext,
}

impl DeleteAccountCommandRequest {
    pub fn new(ctx: SessionContext) -> Self {
        Self {
            ctx,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountCommandResponse {
    pub user_id: String,
}

impl DeleteAccountCommandResponse {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
        }
    }
}

#[async_trait]
impl Command<DeleteAccountCommandRequest, DeleteAccountCommandResponse> for DeleteAccountCommand {
    async fn execute(&self, req: DeleteAccountCommandRequest) -> Result<DeleteAccountCommandResponse, CommandError> {
        self.auth_service.delete_account(&req.ctx)
            .await.map_err(CommandError::from).map(|_| DeleteAccountCommandResponse::new(req.ctx.user_id()))
    }
}
