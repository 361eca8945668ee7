pub mod service;

use async_trait::async_trait;
use crate::auth::dto::{Credentials, Registration, UserProfile};
use crate::core::library::LibraryResult;
use crate::core::session::SessionContext;

#[async_trait]
pub trait AuthService: Sync + Send {
    // opens a session; the caller keeps the context and passes it to every later call
    async fn login(&self, credentials: &Credentials) -> LibraryResult<(SessionContext, UserProfile)>;
    async fn register(&self, registration: &Registration) -> LibraryResult<UserProfile>;
    async fn update_profile(&self, ctx: &SessionContext, profile: &UserProfile) -> LibraryResult<UserProfile>;
    async fn delete_account(&self, ctx: &SessionContext) -> LibraryResult<()>;
}
