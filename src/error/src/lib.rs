//! Shared error taxonomy
//!
//! Every failure in the battle and progression core falls into one of four
//! kinds: a rejected player action, a lookup of an unknown template, a
//! persistence failure, or an exhausted resource. None of them is fatal.

use thiserror::Error;

/// Errors surfaced across component boundaries
#[derive(Debug, Error)]
pub enum GameError {
    /// Player input that cannot be honoured right now (turn does not advance)
    #[error("{0}")]
    Rejected(String),

    /// Catalog lookup for an id that does not exist
    #[error("Unknown {kind}: {id}")]
    UnknownTemplate { kind: &'static str, id: String },

    /// Save system error
    #[error("Save system error: {0}")]
    Persistence(#[from] anyhow::Error),

    /// IO error from a storage backend
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored blob was written by an unknown version
    #[error("Incompatible save version: {0}")]
    VersionMismatch(String),

    /// Expected outcome such as a full inventory or an empty purse
    #[error("{0}")]
    ResourceExhausted(String),
}

/// Coarse classification used by callers that only care about recovery policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Rejected,
    UnknownTemplate,
    Persistence,
    ResourceExhausted,
}

impl GameError {
    pub fn unknown(kind: &'static str, id: impl Into<String>) -> Self {
        GameError::UnknownTemplate {
            kind,
            id: id.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::Rejected(_) => ErrorKind::Rejected,
            GameError::UnknownTemplate { .. } => ErrorKind::UnknownTemplate,
            GameError::Persistence(_)
            | GameError::Io(_)
            | GameError::Serialization(_)
            | GameError::VersionMismatch(_) => ErrorKind::Persistence,
            GameError::ResourceExhausted(_) => ErrorKind::ResourceExhausted,
        }
    }
}

/// Turn any game error into a message fit for the player log
pub fn handle_error(error: &GameError) -> String {
    match error {
        GameError::Rejected(msg) | GameError::ResourceExhausted(msg) => msg.clone(),
        GameError::UnknownTemplate { .. } => "Unknown item!".to_string(),
        GameError::VersionMismatch(v) => format!("Save version {v} is not supported"),
        GameError::Io(e) => match e.kind() {
            std::io::ErrorKind::NotFound => "No save data found".to_string(),
            std::io::ErrorKind::PermissionDenied => "Save file is not accessible".to_string(),
            _ => format!("IO error: {e}"),
        },
        GameError::Serialization(_) => "Save data is corrupted".to_string(),
        GameError::Persistence(_) => error.to_string(),
    }
}
