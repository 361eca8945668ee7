use crate::catalog::domain::CatalogService;
use crate::catalog::domain::service::CatalogServiceImpl;
use crate::core::domain::Configuration;
use crate::gateway::factory::CatalogHandles;

pub fn create_catalog_service(config: &Configuration, handles: &CatalogHandles) -> Box<dyn CatalogService> {
    Box::new(CatalogServiceImpl::new(config, handles.books.clone(), handles.copies.clone()))
}
