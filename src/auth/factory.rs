use crate::auth::domain::AuthService;
use crate::auth::domain::service::AuthServiceImpl;
use crate::core::domain::Configuration;
use crate::gateway::factory::CatalogHandles;

pub fn create_auth_service(config: &Configuration, handles: &CatalogHandles) -> Box<dyn AuthService> {
    Box::new(AuthServiceImpl::new(config, handles.auth.clone()))
}
