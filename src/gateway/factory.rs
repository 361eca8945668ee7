use std::sync::Arc;
use crate::auth::repository::AuthRepository;
use crate::auth::repository::rest_auth_repository::RestAuthRepository;
use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::copies::domain::model::CopyEntity;
use crate::copies::repository::CopyRepository;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::gateway::memory::MemoryCatalog;
use crate::gateway::rest::{CatalogClient, RestRepository};
use crate::loans::domain::model::LoanEntity;
use crate::loans::repository::LoanRepository;
use crate::members::domain::model::MemberEntity;
use crate::members::repository::MemberRepository;

// One handle per Catalog Store collection, shared by every service.
#[derive(Clone)]
pub struct CatalogHandles {
    pub books: Arc<dyn BookRepository>,
    pub copies: Arc<dyn CopyRepository>,
    pub members: Arc<dyn MemberRepository>,
    pub loans: Arc<dyn LoanRepository>,
    pub auth: Arc<dyn AuthRepository>,
}

pub fn create_handles(config: &Configuration) -> LibraryResult<CatalogHandles> {
    match config.store {
        RepositoryStore::Rest => {
            let client = CatalogClient::new(config)?;
            tracing::info!("using catalog store at {}", config.catalog_url);
            Ok(CatalogHandles {
                books: Arc::new(RestRepository::<BookEntity>::new(client.clone())),
                copies: Arc::new(RestRepository::<CopyEntity>::new(client.clone())),
                members: Arc::new(RestRepository::<MemberEntity>::new(client.clone())),
                loans: Arc::new(RestRepository::<LoanEntity>::new(client.clone())),
                auth: Arc::new(RestAuthRepository::new(client)),
            })
        }
        RepositoryStore::Memory => {
            tracing::info!("using in-memory catalog store");
            Ok(memory_handles(MemoryCatalog::new()))
        }
    }
}

pub fn memory_handles(catalog: MemoryCatalog) -> CatalogHandles {
    CatalogHandles {
        books: Arc::new(catalog.clone()),
        copies: Arc::new(catalog.clone()),
        members: Arc::new(catalog.clone()),
        loans: Arc::new(catalog.clone()),
        auth: Arc::new(catalog),
    }
}
