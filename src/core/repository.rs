use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::session::SessionContext;

// The Catalog Store only lists whole collections; there is no get-by-id endpoint.
#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // list all entities
    async fn list(&self, ctx: &SessionContext) -> LibraryResult<Vec<Entity>>;

    // create an entity, returns the stored record
    async fn create(&self, ctx: &SessionContext, entity: &Entity) -> LibraryResult<Entity>;

    // updates an entity, returns the stored record
    async fn update(&self, ctx: &SessionContext, entity: &Entity) -> LibraryResult<Entity>;

    // delete an entity
    async fn delete(&self, ctx: &SessionContext, id: &str) -> LibraryResult<()>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum RepositoryStore {
    #[serde(alias = "rest", alias = "REST")]
    Rest,
    #[serde(alias = "memory", alias = "MEMORY")]
    Memory,
}

impl Default for RepositoryStore {
    fn default() -> Self {
        RepositoryStore::Rest
    }
}

pub(crate) fn find_by_id<T: Identifiable + Clone>(records: &[T], kind: &str, id: &str) -> LibraryResult<T> {
    records.iter()
        .find(|r| r.id() == id)
        .cloned()
        .ok_or_else(|| LibraryError::not_found(format!("{} with id {} not found", kind, id).as_str()))
}

#[cfg(test)]
mod tests {
    use crate::core::domain::Identifiable;
    use crate::core::library::LibraryError;
    use crate::core::repository::{find_by_id, RepositoryStore};

    #[derive(Clone)]
    struct Rec(&'static str);

    impl Identifiable for Rec {
        fn id(&self) -> String {
            self.0.to_string()
        }
    }

    #[tokio::test]
    async fn test_should_find_by_id() {
        let records = vec![Rec("1"), Rec("2")];
        assert_eq!("2", find_by_id(&records, "rec", "2").expect("should find").0);
        assert!(matches!(find_by_id(&records, "rec", "3"), Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_parse_store() {
        let store: RepositoryStore = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(RepositoryStore::Memory, store);
        assert_eq!(RepositoryStore::Rest, RepositoryStore::default());
    }
}
