use std::sync::Arc;
use async_trait::async_trait;
use crate::auth::domain::AuthService;
use crate::auth::dto::{Credentials, Registration, UserProfile};
use crate::auth::repository::AuthRepository;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::session::SessionContext;
use crate::utils::wire::non_blank;

pub struct AuthServiceImpl {
    auth_repository: Arc<dyn AuthRepository>,
}

impl AuthServiceImpl {
    pub fn new(_config: &Configuration, auth_repository: Arc<dyn AuthRepository>) -> Self {
        Self {
            auth_repository,
        }
    }
}

fn ensure_user(ctx: &SessionContext) -> LibraryResult<()> {
    ctx.ensure_active()?;
    if ctx.user_id().trim().is_empty() {
        return Err(LibraryError::auth("session carries no user id", Some("401".to_string())));
    }
    Ok(())
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn login(&self, credentials: &Credentials) -> LibraryResult<(SessionContext, UserProfile)> {
        credentials.validate()?;
        let res = self.auth_repository.login(credentials).await?;
        let token = non_blank(res.token.clone()).ok_or_else(|| {
            let message = non_blank(res.message.clone()).unwrap_or_else(|| "login answered without a token".to_string());
            LibraryError::auth(message.as_str(), Some("401".to_string()))
        })?;
        let profile = res.profile();
        let ctx = SessionContext::new(token.as_str(), profile.id.as_deref().unwrap_or_default());
        tracing::info!("session opened for user {}", ctx.user_id());
        Ok((ctx, profile))
    }

    async fn register(&self, registration: &Registration) -> LibraryResult<UserProfile> {
        registration.validate()?;
        let profile = self.auth_repository.register(&registration.to_wire()).await?;
        tracing::info!("account registered for {}", registration.email.trim());
        Ok(profile)
    }

    async fn update_profile(&self, ctx: &SessionContext, profile: &UserProfile) -> LibraryResult<UserProfile> {
        ensure_user(ctx)?;
        self.auth_repository.update_profile(ctx, profile).await
    }

    async fn delete_account(&self, ctx: &SessionContext) -> LibraryResult<()> {
        ensure_user(ctx)?;
        self.auth_repository.delete_account(ctx).await?;
        tracing::warn!("account {} deleted", ctx.user_id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::domain::AuthService;
    use crate::auth::dto::{Credentials, Registration, UserProfile};
    use crate::auth::factory;
    use crate::core::domain::Configuration;
    use crate::core::library::LibraryError;
    use crate::core::session::SessionContext;
    use crate::gateway::factory::memory_handles;
    use crate::gateway::memory::MemoryCatalog;

    fn registration(email: &str) -> Registration {
        Registration {
            telephone: "0611223344".to_string(),
            prenom: "Jeanne".to_string(),
            nom: "Durand".to_string(),
            biblio_name: "Médiathèque".to_string(),
            email: email.to_string(),
            password: "secret-123".to_string(),
            confirm_password: "secret-123".to_string(),
        }
    }

    fn service() -> Box<dyn AuthService> {
        factory::create_auth_service(&Configuration::new("test"), &memory_handles(MemoryCatalog::new()))
    }

    #[tokio::test]
    async fn test_should_register_and_login() {
        let svc = service();
        let profile = svc.register(&registration("jeanne@biblio.fr")).await.expect("should register");
        assert_eq!("Jeanne Durand", profile.display_name());

        let (ctx, logged) = svc.login(&Credentials::new("jeanne@biblio.fr", "secret-123")).await.expect("should login");
        assert!(ctx.ensure_active().is_ok());
        assert_eq!(profile.id, logged.id);
        assert_eq!(logged.id.as_deref(), Some(ctx.user_id()));

        let err = svc.login(&Credentials::new("jeanne@biblio.fr", "wrong-pass")).await.unwrap_err();
        assert!(matches!(err, LibraryError::Auth { .. }));
    }

    #[tokio::test]
    async fn test_should_validate_before_calling_store() {
        let svc = service();
        let mut bad = registration("jeanne@biblio.fr");
        bad.confirm_password = "other".to_string();
        assert!(matches!(svc.register(&bad).await, Err(LibraryError::Validation { .. })));
        assert!(matches!(svc.login(&Credentials::new("", "x")).await, Err(LibraryError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_should_update_and_delete_account() {
        let svc = service();
        let _ = svc.register(&registration("paul@biblio.fr")).await.unwrap();
        let (ctx, mut profile) = svc.login(&Credentials::new("paul@biblio.fr", "secret-123")).await.unwrap();

        profile.biblio_name = Some("Bibliothèque Centrale".to_string());
        let updated = svc.update_profile(&ctx, &profile).await.expect("should update profile");
        assert_eq!(profile.biblio_name, updated.biblio_name);

        svc.delete_account(&ctx).await.expect("should delete account");
        assert!(svc.login(&Credentials::new("paul@biblio.fr", "secret-123")).await.is_err());
    }

    #[tokio::test]
    async fn test_should_require_user_in_session() {
        let svc = service();
        let err = svc.update_profile(&SessionContext::new("token", ""), &UserProfile::default()).await.unwrap_err();
        assert!(matches!(err, LibraryError::Auth { .. }));
    }
}
