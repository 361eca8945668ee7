use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::RepositoryStore;

// Identifiable defines common traits that can be shared by catalog records
pub trait Identifiable: Sync + Send {
    fn id(&self) -> String;
}

// ClientOptions bounds every Catalog Store request
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ClientOptions {
    pub timeout_ms: u64,
    // extra attempts after a transport failure, idempotent requests only
    pub max_retries: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        ClientOptions {
            timeout_ms: 10_000,
            max_retries: 1,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ListingOptions {
    pub books_page_size: usize,
    pub copies_page_size: usize,
    pub members_page_size: usize,
    pub loans_page_size: usize,
    pub recent_activity_limit: usize,
}

impl Default for ListingOptions {
    fn default() -> Self {
        ListingOptions {
            books_page_size: 12,
            copies_page_size: 12,
            members_page_size: 10,
            loans_page_size: 10,
            recent_activity_limit: 5,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerOptions {
    pub host: String,
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        ServerOptions {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    // "json" or "text"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

// Configuration abstracts config options for the admin client
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Configuration {
    pub catalog_url: String,
    pub store: RepositoryStore,
    pub client: ClientOptions,
    pub listing: ListingOptions,
    pub server: ServerOptions,
    pub logging: LoggingConfig,
}

impl Configuration {
    pub fn new(catalog_url: &str) -> Self {
        Configuration {
            catalog_url: catalog_url.trim_end_matches('/').to_string(),
            store: RepositoryStore::Rest,
            client: ClientOptions::default(),
            listing: ListingOptions::default(),
            server: ServerOptions::default(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn with_store(mut self, store: RepositoryStore) -> Self {
        self.store = store;
        self
    }

    // Loads defaults, then config/lms-admin.{toml,yaml,json}, then LMS_ADMIN_* variables
    // (nested keys use a double underscore, e.g. LMS_ADMIN_CLIENT__TIMEOUT_MS).
    pub fn load() -> LibraryResult<Self> {
        let config = Config::builder()
            .add_source(File::with_name("config/lms-admin").required(false))
            .add_source(
                Environment::with_prefix("LMS_ADMIN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let mut loaded: Configuration = config.try_deserialize()?;
        loaded.catalog_url = loaded.catalog_url.trim_end_matches('/').to_string();
        Ok(loaded)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new("http://localhost:8082")
    }
}

impl From<ConfigError> for LibraryError {
    fn from(err: ConfigError) -> Self {
        LibraryError::validation(
            format!("invalid configuration {:?}", err).as_str(), None)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    #[tokio::test]
    async fn test_should_build_config() {
        let config = Configuration::new("http://catalog:8082/");
        assert_eq!("http://catalog:8082", config.catalog_url.as_str());
        assert_eq!(RepositoryStore::Rest, config.store);
        assert_eq!(10_000, config.client.timeout_ms);
        assert_eq!(1, config.client.max_retries);
        assert_eq!(12, config.listing.books_page_size);
        assert_eq!(10, config.listing.members_page_size);
        assert_eq!(5, config.listing.recent_activity_limit);
    }

    #[tokio::test]
    async fn test_should_fill_missing_sections_with_defaults() {
        let config: Configuration = serde_json::from_str(
            r#"{"catalog_url": "http://x", "store": "Memory", "client": {"timeout_ms": 250}}"#).unwrap();
        assert_eq!(RepositoryStore::Memory, config.store);
        assert_eq!(250, config.client.timeout_ms);
        assert_eq!(1, config.client.max_retries);
        assert_eq!(3000, config.server.port);
        assert_eq!("info", config.logging.level.as_str());
    }
}
