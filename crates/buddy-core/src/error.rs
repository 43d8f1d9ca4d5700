//! Error types for the Buddy Builder application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejections raised by the create and settings forms.
///
/// These are surfaced to the user as correctable messages and never reach
/// the store.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    /// Name was empty or whitespace-only.
    #[error("Name is required and cannot be empty")]
    MissingName,

    /// Personality was empty or not one of the known labels.
    #[error("Personality is required and must be one of Friendly, Professional, Creative, Witty")]
    MissingPersonality,

    /// Creativity slider value above 100.
    #[error("Creativity must be between 0 and 100 (got {0})")]
    CreativityOutOfRange(u8),

    /// Uploaded image exceeds the size limit.
    #[error("Image is {size} bytes; the limit is {limit} bytes")]
    ImageTooLarge { size: usize, limit: usize },

    /// Transform requested before both an image and a style were chosen.
    #[error("Select an image and a style first")]
    IncompleteTransform,
}

/// A shared error type for the entire application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum BuddyError {
    /// Form input rejected by the validator
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Stored buddy data could not be read back as a well-formed collection
    #[error("Persisted data is corrupt: {0}")]
    PersistenceCorruption(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BuddyError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a PersistenceCorruption error
    pub fn corruption(message: impl Into<String>) -> Self {
        Self::PersistenceCorruption(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a persistence corruption error
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::PersistenceCorruption(_))
    }

    /// Returns the validation error, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<ValidationError> for BuddyError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<std::io::Error> for BuddyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for BuddyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for BuddyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for BuddyError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<version_migrate::MigrationError> for BuddyError {
    fn from(err: version_migrate::MigrationError) -> Self {
        Self::Migration(err.to_string())
    }
}

/// A type alias for `Result<T, BuddyError>`.
pub type Result<T> = std::result::Result<T, BuddyError>;
