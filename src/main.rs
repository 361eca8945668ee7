use std::net::SocketAddr;
use lms_admin::app;
use lms_admin::core::controller::AppState;
use lms_admin::core::domain::Configuration;
use lms_admin::core::library::{LibraryError, LibraryResult};
use lms_admin::utils::logs::setup_tracing;

#[tokio::main]
async fn main() -> LibraryResult<()> {
    // a missing .env is fine, the environment and config file still apply
    let _ = dotenvy::dotenv();
    let config = Configuration::load()?;
    setup_tracing(&config.logging);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()
        .map_err(|err| LibraryError::validation(format!("invalid server address {}", err).as_str(), None))?;
    let state = AppState::new(config)?;

    tracing::info!("lms-admin listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(app(state).into_make_service())
        .await
        .map_err(|err| LibraryError::runtime(format!("server stopped {}", err).as_str(), None))
}
