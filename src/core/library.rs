use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum LibraryError {
    // Malformed or missing input, always detected before any Catalog Store call.
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    // The Catalog Store state does not allow the operation, e.g. a copy is no longer available.
    Conflict {
        message: String,
        reason_code: Option<String>,
    },
    NotFound {
        message: String,
    },
    // Transport failure or timeout. Only this kind may be retried automatically.
    Network {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    // Missing, expired or rejected credential.
    Auth {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn conflict(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Conflict { message: message.to_string(), reason_code }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn network(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::Network { message: message.to_string(), reason_code, retryable }
    }

    pub fn auth(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Auth { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    // Maps a non-success HTTP status returned by the Catalog Store.
    pub fn from_status(status: u16, message: &str) -> LibraryError {
        let reason = Some(status.to_string());
        match status {
            400 | 422 => LibraryError::validation(
                format!("catalog store rejected request {}", message).as_str(), reason),
            401 | 403 => LibraryError::auth(
                format!("catalog store refused credential {}", message).as_str(), reason),
            404 => LibraryError::not_found(
                format!("catalog store resource not found {}", message).as_str()),
            409 => LibraryError::conflict(
                format!("catalog store state conflict {}", message).as_str(), reason),
            408 | 429 | 502 | 503 | 504 => LibraryError::network(
                format!("catalog store unavailable {}", message).as_str(), reason, false),
            _ => LibraryError::runtime(
                format!("catalog store error {}", message).as_str(), reason),
        }
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::Validation { .. } => { false }
            LibraryError::Conflict { .. } => { false }
            LibraryError::NotFound { .. } => { false }
            LibraryError::Network { retryable, .. } => { *retryable }
            LibraryError::Auth { .. } => { false }
            LibraryError::Serialization { .. } => { false }
            LibraryError::Runtime { .. } => { false }
        }
    }
}

impl std::error::Error for LibraryError {}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::runtime(
            format!("io {:?}", err).as_str(), None)
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Validation { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::Conflict { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::NotFound { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Network { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::Auth { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::Serialization { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

/// A specialized Result type for the library admin client.
pub type LibraryResult<T> = Result<T, LibraryError>;

// One page of an in-memory listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedResult<T> {
    // zero-based page index, clamped to the last page
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    // number of records after filtering, before slicing
    pub total: usize,
    // page numbers to offer around the current one
    pub pages: Vec<usize>,
    pub records: Vec<T>,
}

impl<T> PaginatedResult<T> {
    pub(crate) fn new(page: usize, page_size: usize, page_count: usize, total: usize,
                      pages: Vec<usize>, records: Vec<T>) -> Self {
        PaginatedResult {
            page,
            page_size,
            page_count,
            total,
            pages,
            records,
        }
    }

    pub fn map<U, F: Fn(T) -> U>(self, f: F) -> PaginatedResult<U> {
        PaginatedResult {
            page: self.page,
            page_size: self.page_size,
            page_count: self.page_count,
            total: self.total,
            pages: self.pages,
            records: self.records.into_iter().map(f).collect(),
        }
    }
}


#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CopyStatus {
    Available,
    Borrowed,
    Damaged,
    Lost,
    Reserved,
    Unknown,
}

impl CopyStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CopyStatus::Available => "Disponible",
            CopyStatus::Borrowed => "Emprunté",
            CopyStatus::Damaged => "Endommagé",
            CopyStatus::Lost => "Perdu",
            CopyStatus::Reserved => "Réservé",
            CopyStatus::Unknown => "Inconnu",
        }
    }
}

impl From<String> for CopyStatus {
    fn from(s: String) -> Self {
        match s.trim().to_uppercase().as_str() {
            "AVAILABLE" => CopyStatus::Available,
            "BORROWED" => CopyStatus::Borrowed,
            "DAMAGED" => CopyStatus::Damaged,
            "LOST" => CopyStatus::Lost,
            "RESERVED" => CopyStatus::Reserved,
            _ => CopyStatus::Unknown,
        }
    }
}

impl From<CopyStatus> for String {
    fn from(status: CopyStatus) -> Self {
        status.to_string()
    }
}

impl Display for CopyStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            CopyStatus::Available => write!(f, "AVAILABLE"),
            CopyStatus::Borrowed => write!(f, "BORROWED"),
            CopyStatus::Damaged => write!(f, "DAMAGED"),
            CopyStatus::Lost => write!(f, "LOST"),
            CopyStatus::Reserved => write!(f, "RESERVED"),
            CopyStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LoanStatus {
    Active,
    Overdue,
    Returned,
    Renewed,
    Unknown,
}

impl LoanStatus {
    // Open loans keep their copies BORROWED.
    pub fn is_open(&self) -> bool {
        !matches!(self, LoanStatus::Returned)
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Active => "En cours",
            LoanStatus::Overdue => "En retard",
            LoanStatus::Returned => "Retourné",
            LoanStatus::Renewed => "Prolongé",
            LoanStatus::Unknown => "Inconnu",
        }
    }

    pub fn can_transition_to(&self, next: LoanStatus) -> bool {
        matches!((self, next),
            (LoanStatus::Active, LoanStatus::Overdue) |
            (LoanStatus::Active, LoanStatus::Renewed) |
            (LoanStatus::Overdue, LoanStatus::Renewed) |
            (LoanStatus::Active, LoanStatus::Returned) |
            (LoanStatus::Overdue, LoanStatus::Returned) |
            (LoanStatus::Renewed, LoanStatus::Returned) |
            (LoanStatus::Unknown, LoanStatus::Returned))
    }
}

impl From<String> for LoanStatus {
    // The catalog store sometimes echoes the french label it was sent.
    fn from(s: String) -> Self {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" | "EN COURS" => LoanStatus::Active,
            "OVERDUE" | "EN RETARD" => LoanStatus::Overdue,
            "RETURNED" | "RETOURNÉ" | "RETOURNE" => LoanStatus::Returned,
            "RENEWED" | "PROLONGÉ" | "PROLONGE" => LoanStatus::Renewed,
            _ => LoanStatus::Unknown,
        }
    }
}

impl From<LoanStatus> for String {
    fn from(status: LoanStatus) -> Self {
        status.to_string()
    }
}

impl Display for LoanStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LoanStatus::Active => write!(f, "ACTIVE"),
            LoanStatus::Overdue => write!(f, "OVERDUE"),
            LoanStatus::Returned => write!(f, "RETURNED"),
            LoanStatus::Renewed => write!(f, "RENEWED"),
            LoanStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::{CopyStatus, LibraryError, LoanStatus};

    #[tokio::test]
    async fn test_should_create_validation_error() {
        assert!(matches!(LibraryError::validation("test", None), LibraryError::Validation{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_conflict_error() {
        assert!(matches!(LibraryError::conflict("test", None), LibraryError::Conflict{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_not_found_error() {
        assert!(matches!(LibraryError::not_found("test"), LibraryError::NotFound{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_auth_error() {
        assert!(matches!(LibraryError::auth("test", None), LibraryError::Auth{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_map_http_status() {
        assert!(matches!(LibraryError::from_status(400, "x"), LibraryError::Validation{ .. }));
        assert!(matches!(LibraryError::from_status(422, "x"), LibraryError::Validation{ .. }));
        assert!(matches!(LibraryError::from_status(401, "x"), LibraryError::Auth{ .. }));
        assert!(matches!(LibraryError::from_status(403, "x"), LibraryError::Auth{ .. }));
        assert!(matches!(LibraryError::from_status(404, "x"), LibraryError::NotFound{ .. }));
        assert!(matches!(LibraryError::from_status(409, "x"), LibraryError::Conflict{ .. }));
        assert!(matches!(LibraryError::from_status(503, "x"), LibraryError::Network{ .. }));
        assert!(matches!(LibraryError::from_status(500, "x"), LibraryError::Runtime{ .. }));
    }

    #[tokio::test]
    async fn test_should_create_retryable_error() {
        assert_eq!(false, LibraryError::validation("test", None).retryable());
        assert_eq!(false, LibraryError::conflict("test", None).retryable());
        assert_eq!(false, LibraryError::not_found("test").retryable());
        assert_eq!(false, LibraryError::network("test", None, false).retryable());
        assert_eq!(true, LibraryError::network("test", None, true).retryable());
        assert_eq!(false, LibraryError::auth("test", None).retryable());
        assert_eq!(false, LibraryError::serialization("test").retryable());
        assert_eq!(false, LibraryError::runtime("test", None).retryable());
    }

    #[tokio::test]
    async fn test_should_format_copy_status() {
        let statuses = vec![
            CopyStatus::Available,
            CopyStatus::Borrowed,
            CopyStatus::Damaged,
            CopyStatus::Lost,
            CopyStatus::Reserved,
            CopyStatus::Unknown,
        ];
        for status in statuses {
            let str = status.to_string();
            let str_status = CopyStatus::from(str);
            assert_eq!(status, str_status);
        }
        assert_eq!(CopyStatus::Available, CopyStatus::from("available".to_string()));
        assert_eq!(CopyStatus::Unknown, CopyStatus::from("IN_TRANSIT".to_string()));
    }

    #[tokio::test]
    async fn test_should_parse_loan_status_codes_and_labels() {
        assert_eq!(LoanStatus::Active, LoanStatus::from("ACTIVE".to_string()));
        assert_eq!(LoanStatus::Returned, LoanStatus::from("Retourné".to_string()));
        assert_eq!(LoanStatus::Renewed, LoanStatus::from("Prolongé".to_string()));
        assert_eq!(LoanStatus::Overdue, LoanStatus::from("overdue".to_string()));
        assert_eq!(LoanStatus::Unknown, LoanStatus::from("LOST".to_string()));
    }

    #[tokio::test]
    async fn test_should_serialize_statuses_as_codes() {
        assert_eq!("\"BORROWED\"", serde_json::to_string(&CopyStatus::Borrowed).unwrap());
        assert_eq!("\"RETURNED\"", serde_json::to_string(&LoanStatus::Returned).unwrap());
        let status: LoanStatus = serde_json::from_str("\"En retard\"").unwrap();
        assert_eq!(LoanStatus::Overdue, status);
    }

    #[tokio::test]
    async fn test_should_only_allow_lifecycle_transitions() {
        let all = [LoanStatus::Active, LoanStatus::Overdue, LoanStatus::Returned, LoanStatus::Renewed, LoanStatus::Unknown];
        for next in all {
            assert!(!LoanStatus::Returned.can_transition_to(next));
        }
        assert!(LoanStatus::Active.can_transition_to(LoanStatus::Returned));
        assert!(LoanStatus::Overdue.can_transition_to(LoanStatus::Returned));
        assert!(LoanStatus::Renewed.can_transition_to(LoanStatus::Returned));
        assert!(LoanStatus::Active.can_transition_to(LoanStatus::Overdue));
        assert!(!LoanStatus::Overdue.can_transition_to(LoanStatus::Active));
        assert!(!LoanStatus::Renewed.can_transition_to(LoanStatus::Active));
    }
}
