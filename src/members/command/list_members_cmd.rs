use async_trait::async_trait;
use serde::Serialize;
use crate::core::command::{Command, CommandError};
use crate::core::library::PaginatedResult;
use crate::core::listing::ListQuery;
use crate::core::session::SessionContext;
use crate::members::domain::MemberService;
use crate::members::domain::model::MemberEntity;

pub struct ListMembersCommand {
    member_service: Box<dyn MemberService>,
}

impl ListMembersCommand {
    pub fn new(member_service: Box<dyn MemberService>) -> Self {
        Self {
            member_service,
        }
    }
}

#[derive(Debug)]
pub struct ListMembersCommandRequest {
    ctx: SessionContext,
    query: ListQuery,
}

impl ListMembersCommandRequest {
    pub fn new(ctx: SessionContext, query: ListQuery) -> Self {
        Self {
            ctx,
            query,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListMembersCommandResponse {
    pub members: PaginatedResult<MemberEntity>,
}

impl ListMembersCommandResponse {
    pub fn new(members: PaginatedResult<MemberEntity>) -> Self {
        Self {
            members,
        }
    }
}

#[async_trait]
impl Command<ListMembersCommandRequest, ListMembersCommandResponse> for ListMembersCommand {
    async fn execute(&self, req: ListMembersCommandRequest) -> Result<ListMembersCommandResponse, CommandError> {
        self.member_service.list_members(&req.ctx, &req.query)
            .await.map_err(CommandError::from).map(ListMembersCommandResponse::new)
    }
}
