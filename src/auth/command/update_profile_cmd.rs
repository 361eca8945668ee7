use async_trait::async_trait;
use serde::Serialize;
use crate::auth::domain::AuthService;
use crate::auth::dto::UserProfile;
use crate::core::command::{Command, CommandError};
use crate::core::session::SessionContext;

pub struct UpdateProfileCommand {
    auth_service: Box<dyn AuthService>,
}

impl UpdateProfileCommand {
    pub fn new(auth_service: Box<dyn AuthService>) -> Self {
        Self {
            auth_service,
        }
    }
}

#[derive(Debug)]
pub struct UpdateProfileCommandRequest {
    ctx: SessionContext,
    profile: UserProfile,
}

impl UpdateProfileCommandRequest {
    pub fn new(ctx: SessionContext, profile: UserProfile) -> Self {
        Self {
            ctx,
            profile,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileCommandResponse {
    pub display_name: String,
    pub profile: UserProfile,
}

impl UpdateProfileCommandResponse {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            display_name: profile.display_name(),
            profile,
        }
    }
}

#[async_trait]
impl Command<UpdateProfileCommandRequest, UpdateProfileCommandResponse> for UpdateProfileCommand {
    async fn execute(&self, req: UpdateProfileCommandRequest) -> Result<UpdateProfileCommandResponse, CommandError> {
        self.auth_service.update_profile(&req.ctx, &req.profile)
            .await.map_err(CommandError::from).map(UpdateProfileCommandResponse::new)
    }
}
