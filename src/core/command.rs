use async_trait::async_trait;
use crate::core::library::LibraryError;

#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    Access {
        message: String,
        reason_code: Option<String>,
    },
    Conflict {
        message: String,
        reason_code: Option<String>,
    },
    NotFound {
        message: String,
    },
    Network {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
}

impl CommandError {
    // Text shown to the librarian; details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            CommandError::Access { .. } => "Session expirée ou invalide, veuillez vous reconnecter.",
            CommandError::Conflict { .. } => "L'opération est en conflit avec l'état actuel du catalogue.",
            CommandError::NotFound { .. } => "Élément introuvable.",
            CommandError::Network { .. } => "Le serveur du catalogue est injoignable, veuillez réessayer.",
            CommandError::Runtime { .. } => "Une erreur inattendue s'est produite.",
            CommandError::Serialization { .. } => "Réponse du catalogue illisible.",
            CommandError::Validation { .. } => "Données du formulaire invalides.",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::Access { .. } => "auth",
            CommandError::Conflict { .. } => "conflict",
            CommandError::NotFound { .. } => "not_found",
            CommandError::Network { .. } => "network",
            CommandError::Runtime { .. } => "runtime",
            CommandError::Serialization { .. } => "serialization",
            CommandError::Validation { .. } => "validation",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CommandError::Access { message, .. } => message,
            CommandError::Conflict { message, .. } => message,
            CommandError::NotFound { message } => message,
            CommandError::Network { message, .. } => message,
            CommandError::Runtime { message, .. } => message,
            CommandError::Serialization { message } => message,
            CommandError::Validation { message, .. } => message,
        }
    }
}

#[async_trait]
pub trait Command<Request, Response> {
    async fn execute(&self, req: Request) -> Result<Response, CommandError>;
}

impl From<LibraryError> for CommandError {
    fn from(other: LibraryError) -> Self {
        match other {
            LibraryError::Validation { message, reason_code } => {
                CommandError::Validation { message, reason_code }
            }
            LibraryError::Conflict { message, reason_code } => {
                CommandError::Conflict { message, reason_code }
            }
            LibraryError::NotFound { message } => {
                CommandError::NotFound { message }
            }
            LibraryError::Network { message, reason_code, retryable } => {
                CommandError::Network { message, reason_code, retryable }
            }
            LibraryError::Auth { message, reason_code } => {
                CommandError::Access { message, reason_code }
            }
            LibraryError::Serialization { message } => {
                CommandError::Serialization { message }
            }
            LibraryError::Runtime { message, reason_code } => {
                CommandError::Runtime { message, reason_code }
            }
        }
    }
}
