pub mod rest_auth_repository;

use async_trait::async_trait;
use crate::auth::dto::{Credentials, LoginResponse, RegistrationDto, UserProfile};
use crate::core::library::LibraryResult;
use crate::core::session::SessionContext;

#[async_trait]
pub trait AuthRepository: Sync + Send {
    async fn login(&self, credentials: &Credentials) -> LibraryResult<LoginResponse>;

    async fn register(&self, registration: &RegistrationDto) -> LibraryResult<UserProfile>;

    async fn update_profile(&self, ctx: &SessionContext, profile: &UserProfile) -> LibraryResult<UserProfile>;

    async fn delete_account(&self, ctx: &SessionContext) -> LibraryResult<()>;
}
