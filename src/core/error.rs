use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{kind} '{id}' does not exist")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} '{id}' already exists")]
    AlreadyExists { kind: &'static str, id: String },

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Cannot decode value at key '{key}': {reason}")]
    Decode { key: String, reason: String },

    #[error("The transaction function '{0}' doesn't exist, provide a valid transaction function")]
    UnknownTransaction(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Read conflict on key '{0}': value changed since it was read")]
    ReadConflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Lock error: {0}")]
    LockError(String),
}

impl LedgerError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { kind, id: id.into() }
    }

    pub fn already_exists(kind: &'static str, id: impl Into<String>) -> Self {
        Self::AlreadyExists { kind, id: id.into() }
    }

    pub fn decode(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Errors caused by the caller's input or by the current ledger state, as opposed
    /// to failures of the ledger itself.
    pub fn is_caller_error(&self) -> bool {
        !matches!(
            self,
            Self::ReadConflict(_) | Self::Storage(_) | Self::LockError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl<T> From<std::sync::PoisonError<T>> for LedgerError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}
