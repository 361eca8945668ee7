use std::time::Duration;
use crate::core::domain::ClientOptions;
use crate::core::library::{LibraryError, LibraryResult};

pub(crate) fn build_http_client(opts: &ClientOptions) -> LibraryResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(opts.timeout_ms))
        .connect_timeout(Duration::from_millis(opts.timeout_ms))
        .build()
        .map_err(|err| LibraryError::runtime(format!("failed to build http client {:?}", err).as_str(), None))
}

impl From<reqwest::Error> for LibraryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LibraryError::network(format!("catalog store timed out {}", err).as_str(), Some("timeout".to_string()), true)
        } else if err.is_connect() {
            LibraryError::network(format!("catalog store unreachable {}", err).as_str(), Some("connect".to_string()), true)
        } else if err.is_decode() {
            LibraryError::serialization(format!("catalog store payload {}", err).as_str())
        } else if let Some(status) = err.status() {
            LibraryError::from_status(status.as_u16(), format!("{}", err).as_str())
        } else if err.is_request() || err.is_body() {
            LibraryError::network(format!("catalog store request failed {}", err).as_str(), Some("request".to_string()), true)
        } else {
            LibraryError::runtime(format!("http {:?}", err).as_str(), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::domain::ClientOptions;
    use crate::core::library::LibraryError;
    use crate::utils::http::build_http_client;

    #[tokio::test]
    async fn test_should_map_connect_failure_to_retryable_network_error() {
        let client = build_http_client(&ClientOptions { timeout_ms: 500, max_retries: 0 }).unwrap();
        // nothing listens on port 9 of the loopback interface
        let err = client.get("http://127.0.0.1:9/").send().await.unwrap_err();
        let err = LibraryError::from(err);
        assert!(matches!(err, LibraryError::Network { .. }));
        assert!(err.retryable());
    }
}
