use async_trait::async_trait;
use serde::Serialize;
use crate::auth::domain::AuthService;
use crate::auth::dto::{Registration, UserProfile};
use crate::core::command::{Command, CommandError};

pub struct RegisterCommand {
    auth_service: Box<dyn AuthService>,
}

impl RegisterCommand {
    pub fn new(auth_service: Box<dyn AuthService>) -> Self {
        Self {
            auth_service,
        }
    }
}

#[derive(Debug)]
pub struct RegisterCommandRequest {
    registration: Registration,
}

impl RegisterCommandRequest {
    pub fn new(registration: Registration) -> Self {
        Self {
            registration,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterCommandResponse {
    pub profile: UserProfile,
}

impl RegisterCommandResponse {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            profile,
        }
    }
}

#[async_trait]
impl Command<RegisterCommandRequest, RegisterCommandResponse> for RegisterCommand {
    async fn execute(&self, req: RegisterCommandRequest) -> Result<RegisterCommandResponse, CommandError> {
        self.auth_service.register(&req.registration)
            .await.map_err(CommandError::from).map(RegisterCommandResponse::new)
    }
}
