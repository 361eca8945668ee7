use async_trait::async_trait;
use serde_json::Value;
use crate::auth::dto::{Credentials, LoginResponse, RegistrationDto, UserProfile};
use crate::auth::repository::AuthRepository;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::session::SessionContext;
use crate::gateway::rest::CatalogClient;

pub struct RestAuthRepository {
    client: CatalogClient,
}

impl RestAuthRepository {
    pub fn new(client: CatalogClient) -> Self {
        Self {
            client,
        }
    }
}

fn profile_or(value: Value, fallback: UserProfile) -> LibraryResult<UserProfile> {
    match value {
        Value::Object(_) => Ok(serde_json::from_value(value)?),
        _ => Ok(fallback),
    }
}

#[async_trait]
impl AuthRepository for RestAuthRepository {
    async fn login(&self, credentials: &Credentials) -> LibraryResult<LoginResponse> {
        let value = self.client.post(None, "/api/auth/login", credentials).await?;
        match value {
            Value::Object(_) => Ok(serde_json::from_value(value)?),
            other => Err(LibraryError::serialization(format!("unexpected login answer {}", other).as_str())),
        }
    }

    async fn register(&self, registration: &RegistrationDto) -> LibraryResult<UserProfile> {
        let value = self.client.post(None, "/api/auth/register", registration).await?;
        profile_or(value, UserProfile::from(registration))
    }

    async fn update_profile(&self, ctx: &SessionContext, profile: &UserProfile) -> LibraryResult<UserProfile> {
        let path = format!("/api/auth/edit/{}", ctx.user_id());
        let value = self.client.put(ctx, path.as_str(), profile).await?;
        profile_or(value, profile.clone())
    }

    async fn delete_account(&self, ctx: &SessionContext) -> LibraryResult<()> {
        let path = format!("/api/auth/delete/{}", ctx.user_id());
        self.client.delete(ctx, path.as_str()).await.map(|_| ())
    }
}
