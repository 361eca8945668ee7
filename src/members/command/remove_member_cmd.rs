use async_trait::async_trait;
use serde::Serialize;
use crate::core::command::{Command, CommandError};
use crate::core::session::SessionContext;
use crate::members::domain::MemberService;

pub struct RemoveMemberCommand {
    member_service: Box<dyn MemberService>,
}

impl RemoveMemberCommand {
    pub fn new(member_service: Box<dyn MemberService>) -> Self {
        Self {
            member_service,
        }
    }
}

#[derive(Debug)]
pub struct RemoveMemberCommandRequest {
    ctx: SessionContext,
    member_id: String,
}

impl RemoveMemberCommandRequest {
    pub fn new(ctx: SessionContext, member_id: &str) -> Self {
        Self {
            ctx,
            member_id: member_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RemoveMemberCommandResponse {
    pub member_id: String,
}

impl RemoveMemberCommandResponse {
    pub fn new(member_id: String) -> Self {
        Self {
            member_id,
        }
    }
}

#[async_trait]
impl Command<RemoveMemberCommandRequest, RemoveMemberCommandResponse> for RemoveMemberCommand {
    async fn execute(&self, req: RemoveMemberCommandRequest) -> Result<RemoveMemberCommandResponse, CommandError> {
        self.member_service.remove_member(&req.ctx, req.member_id.as_str())
            .await.map_err(CommandError::from).map(|_| RemoveMemberCommandResponse::new(req.member_id))
    }
}
