//! Unified application error types for Nova.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The [`ErrorKind`] values mirror the
//! failure taxonomy callers of the release core can observe.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The referenced release, event, tag, or project does not exist or does
    /// not belong to the stated parent.
    NotFound,
    /// The caller's project role does not allow the action.
    Authorization,
    /// A payload field failed validation (empty or too long).
    Validation,
    /// The release version is already used within the same project.
    DuplicateVersion,
    /// The action is not legal from the release's current status.
    IllegalTransition,
    /// The upload batch has already been approved or rejected.
    AlreadyCommented,
    /// One or more uploaded assets had zero content.
    EmptyAsset,
    /// An asset or report storage operation failed.
    Storage,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// Return the kind as a stable SCREAMING_SNAKE code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Authorization => "AUTHORIZATION",
            Self::Validation => "INVALID_INPUT",
            Self::DuplicateVersion => "DUPLICATE_VERSION",
            Self::IllegalTransition => "ILLEGAL_TRANSITION",
            Self::AlreadyCommented => "ALREADY_COMMENTED",
            Self::EmptyAsset => "EMPTY_ASSET",
            Self::Storage => "STORAGE_FAILURE",
            Self::Database => "DATABASE",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The unified application error used throughout Nova.
///
/// Carries a kind and a human-readable reason. The optional source is kept
/// for logging only; it is never rendered to callers.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a duplicate-version error.
    pub fn duplicate_version(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateVersion, message)
    }

    /// Create an illegal-transition error.
    pub fn illegal_transition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalTransition, message)
    }

    /// Create an already-commented error.
    pub fn already_commented(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyCommented, message)
    }

    /// Create an empty-asset error.
    pub fn empty_asset(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptyAsset, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether the error was caused by the caller rather than the infrastructure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::NotFound
                | ErrorKind::Authorization
                | ErrorKind::Validation
                | ErrorKind::DuplicateVersion
                | ErrorKind::IllegalTransition
                | ErrorKind::AlreadyCommented
                | ErrorKind::EmptyAsset
        )
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let fields: Vec<String> = err
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let reason = errors
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "is not valid".to_string());
                format!("{field} {reason}")
            })
            .collect();
        Self::validation(fields.join("; "))
    }
}
