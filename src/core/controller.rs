use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::core::command::CommandError;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::session::SessionContext;
use crate::gateway::factory::{CatalogHandles, create_handles};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const ISSUED_AT_HEADER: &str = "x-session-issued-at";

#[derive(Clone)]
pub struct AppState {
    pub config: Configuration,
    pub handles: CatalogHandles,
}

impl AppState {
    pub fn new(config: Configuration) -> LibraryResult<AppState> {
        let handles = create_handles(&config)?;
        Ok(AppState {
            config,
            handles,
        })
    }

    pub fn with_handles(config: Configuration, handles: CatalogHandles) -> AppState {
        AppState {
            config,
            handles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    pub detail: String,
}

pub type ServerError = (StatusCode, Json<ErrorBody>);

fn error_body(kind: &str, message: &str, detail: &str) -> Json<ErrorBody> {
    Json(ErrorBody {
        error: kind.to_string(),
        message: message.to_string(),
        detail: detail.to_string(),
    })
}

pub fn json_to_server_error(err: serde_json::Error) -> ServerError {
    (StatusCode::BAD_REQUEST,
     error_body("validation", "Données du formulaire invalides.", format!("{}", err).as_str()))
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        let status = match err {
            CommandError::Validation { .. } => StatusCode::BAD_REQUEST,
            CommandError::Access { .. } => StatusCode::UNAUTHORIZED,
            CommandError::NotFound { .. } => StatusCode::NOT_FOUND,
            CommandError::Conflict { .. } => StatusCode::CONFLICT,
            CommandError::Network { .. } => StatusCode::BAD_GATEWAY,
            CommandError::Serialization { .. } => StatusCode::BAD_GATEWAY,
            CommandError::Runtime { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("request failed {:?}", err);
        } else {
            tracing::warn!("request rejected {:?}", err);
        }
        (status, error_body(err.kind(), err.user_message(), err.message()))
    }
}

// Builds the session from `Authorization: Bearer`, `X-User-Id` and the optional issue time.
#[async_trait]
impl<S> FromRequestParts<S> for SessionContext where S: Send + Sync {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| parts.headers.get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string());

        let token = header(axum::http::header::AUTHORIZATION.as_str())
            .and_then(|v| v.strip_prefix("Bearer ").map(|t| t.trim().to_string()))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| -> ServerError {
                CommandError::Access {
                    message: "missing bearer token".to_string(),
                    reason_code: Some("401".to_string()),
                }.into()
            })?;
        let user_id = header(USER_ID_HEADER).unwrap_or_default();
        // a session issued in the future would never expire
        let now = Utc::now();
        let issued_at = header(ISSUED_AT_HEADER)
            .and_then(|v| DateTime::parse_from_rfc3339(v.as_str()).ok())
            .map(|d| d.with_timezone(&Utc).min(now))
            .unwrap_or(now);
        Ok(SessionContext::issued_at(token.as_str(), user_id.as_str(), issued_at))
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::FromRequestParts;
    use axum::http::{header, Request, StatusCode};
    use chrono::{Duration, Utc};
    use crate::core::command::CommandError;
    use crate::core::controller::{ISSUED_AT_HEADER, ServerError, USER_ID_HEADER};
    use crate::core::library::LibraryError;
    use crate::core::session::SessionContext;

    async fn extract(issued_at: &str) -> SessionContext {
        let (mut parts, _) = Request::builder()
            .header(header::AUTHORIZATION, "Bearer token")
            .header(USER_ID_HEADER, "U1")
            .header(ISSUED_AT_HEADER, issued_at)
            .body(())
            .unwrap()
            .into_parts();
        SessionContext::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_should_not_trust_future_issue_time() {
        let future = (Utc::now() + Duration::days(30)).to_rfc3339();
        let ctx = extract(future.as_str()).await;
        assert!(ctx.expires_at() <= Utc::now() + Duration::hours(24));
        assert!(ctx.is_expired_at(Utc::now() + Duration::hours(25)));

        let stale = (Utc::now() - Duration::hours(25)).to_rfc3339();
        let ctx = extract(stale.as_str()).await;
        assert!(matches!(ctx.ensure_active(), Err(LibraryError::Auth { .. })));
    }

    #[tokio::test]
    async fn test_should_map_command_errors_to_status() {
        let cases = vec![
            (LibraryError::validation("x", None), StatusCode::BAD_REQUEST),
            (LibraryError::auth("x", None), StatusCode::UNAUTHORIZED),
            (LibraryError::not_found("x"), StatusCode::NOT_FOUND),
            (LibraryError::conflict("x", None), StatusCode::CONFLICT),
            (LibraryError::network("x", None, true), StatusCode::BAD_GATEWAY),
            (LibraryError::serialization("x"), StatusCode::BAD_GATEWAY),
            (LibraryError::runtime("x", None), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let (status, _): ServerError = CommandError::from(err).into();
            assert_eq!(expected, status);
        }
    }

    #[tokio::test]
    async fn test_should_expose_user_message_and_detail() {
        let (_, body): ServerError = CommandError::from(LibraryError::conflict("copy 3 is BORROWED", None)).into();
        assert_eq!("conflict", body.error.as_str());
        assert_eq!("copy 3 is BORROWED", body.detail.as_str());
        assert!(!body.message.is_empty());
    }
}
