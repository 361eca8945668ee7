use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::auth::domain::AuthService;
use crate::auth::dto::{Credentials, UserProfile};
use crate::core::command::{Command, CommandError};
use crate::core::session::SessionContext;

pub struct LoginCommand {
    auth_service: Box<dyn AuthService>,
}

impl LoginCommand {
    pub fn new(auth_service: Box<dyn AuthService>) -> Self {
        Self {
            auth_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginCommandRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

impl LoginCommandRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn credentials(&self) -> Credentials {
        Credentials::new(self.email.as_str(), self.password.as_str())
    }
}

// What the admin front keeps for the session: it sends token and user id back on every call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCommandResponse {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    pub display_name: String,
    pub profile: UserProfile,
}

impl LoginCommandResponse {
    pub fn new(ctx: SessionContext, profile: UserProfile) -> Self {
        Self {
            token: ctx.token().to_string(),
            user_id: ctx.user_id().to_string(),
            expires_at: ctx.expires_at(),
            display_name: profile.display_name(),
            profile,
        }
    }
}

#[async_trait]
impl Command<LoginCommandRequest, LoginCommandResponse> for LoginCommand {
    async fn execute(&self, req: LoginCommandRequest) -> Result<LoginCommandResponse, CommandError> {
        self.auth_service.login(&req.credentials())
            .await.map_err(CommandError::from).map(|(ctx, profile)| LoginCommandResponse::new(ctx, profile))
    }
}
