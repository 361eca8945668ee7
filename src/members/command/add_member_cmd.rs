use async_trait::async_trait;
use serde::Serialize;
use crate::core::command::{Command, CommandError};
use crate::core::session::SessionContext;
use crate::members::domain::MemberService;
use crate::members::domain::model::MemberEntity;

pub struct AddMemberCommand {
    member_service: Box<dyn MemberService>,
}

impl AddMemberCommand {
    pub fn new(member_service: Box<dyn MemberService>) -> Self {
        Self {
            member_service,
        }
    }
}

#[derive(Debug)]
pub struct AddMemberCommandRequest {
    ctx: SessionContext,
    member: MemberEntity,
}

impl AddMemberCommandRequest {
    pub fn new(ctx: SessionContext, member: MemberEntity) -> Self {
        Self {
            ctx,
            member,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddMemberCommandResponse {
    pub member: MemberEntity,
}

impl AddMemberCommandResponse {
    pub fn new(member: MemberEntity) -> Self {
        Self {
            member,
        }
    }
}

#[async_trait]
impl Command<AddMemberCommandRequest, AddMemberCommandResponse> for AddMemberCommand {
    async fn execute(&self, req: AddMemberCommandRequest) -> Result<AddMemberCommandResponse, CommandError> {
        self.member_service.add_member(&req.ctx, &req.member)
            .await.map_err(CommandError::from).map(AddMemberCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use crate::core::command::Command;
    use crate::core::domain::Configuration;
    use crate::core::session::SessionContext;
    use crate::gateway::factory::memory_handles;
    use crate::gateway::memory::MemoryCatalog;
    use crate::members::command::add_member_cmd::{AddMemberCommand, AddMemberCommandRequest};
    use crate::members::domain::model::MemberEntity;
    use crate::members::factory;

    lazy_static! {
        static ref SUT_CMD: AsyncOnce<AddMemberCommand> = AsyncOnce::new(async {
                let svc = factory::create_member_service(&Configuration::new("test"), &memory_handles(MemoryCatalog::new()));
                AddMemberCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_add_member() {
        let cmd = SUT_CMD.get().await;
        let res = cmd.execute(AddMemberCommandRequest::new(
            SessionContext::new("token", "U1"), MemberEntity::new("Alice", Some("0611223344"))))
            .await.expect("should add member");
        assert_eq!("Alice", res.member.name.as_str());
        assert!(res.member.is_active);
    }
}
