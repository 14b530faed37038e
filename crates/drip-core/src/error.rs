use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DripError {
    #[error("not initialized: run 'drip init'")]
    NotInitialized,

    #[error("failed to load {what} from {path}: {reason}")]
    Load {
        what: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("failed to persist {what} to {path}: {reason}")]
    Persist {
        what: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("invalid recipient '{0}': expected an E.164 number like +15551234567")]
    InvalidRecipient(String),

    #[error("tour order lists '{0}' but the library has no such item")]
    MissingItem(String),

    #[error("recipient '{0}' has finished the tour")]
    TourExhausted(String),

    #[error("delivery to {recipient} failed: {reason}")]
    Delivery { recipient: String, reason: String },
}

impl DripError {
    pub fn load(what: &'static str, path: &Path, reason: impl Display) -> Self {
        DripError::Load {
            what,
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn persist(what: &'static str, path: &Path, reason: impl Display) -> Self {
        DripError::Persist {
            what,
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DripError>;
