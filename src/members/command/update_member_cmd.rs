use async_trait::async_trait;
use serde::Serialize;
use crate::core::command::{Command, CommandError};
use crate::core::session::SessionContext;
use crate::members::domain::MemberService;
use crate::members::domain::model::MemberEntity;

pub struct UpdateMemberCommand {
    member_service: Box<dyn MemberService>,
}

impl UpdateMemberCommand {
    pub fn new(member_service: Box<dyn MemberService>) -> Self {
        Self {
            member_service,
        }
    }
}

#[derive(Debug)]
pub struct UpdateMemberCommandRequest {
    ctx: SessionContext,
    member: MemberEntity,
}

impl UpdateMemberCommandRequest {
    // the path id wins over whatever the form carries
    pub fn new(ctx: SessionContext, member_id: &str, member: MemberEntity) -> Self {
        Self {
            ctx,
            member: member.with_id(member_id),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateMemberCommandResponse {
    pub member: MemberEntity,
}

impl UpdateMemberCommandResponse {
    pub fn new(member: MemberEntity) -> Self {
        Self {
            member,
        }
    }
}

#[async_trait]
impl Command<UpdateMemberCommandRequest, UpdateMemberCommandResponse> for UpdateMemberCommand {
    async fn execute(&self, req: UpdateMemberCommandRequest) -> Result<UpdateMemberCommandResponse, CommandError> {
        self.member_service.update_member(&req.ctx, &req.member)
            .await.map_err(CommandError::from).map(UpdateMemberCommandResponse::new)
    }
}
