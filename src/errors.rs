//! Unified error type for the ledgers, the store and application startup.
//!
//! Every variant belongs to one [`ErrorCategory`]. Callers at an operation
//! boundary use the category to decide how to surface the failure (inline
//! field message, blocking toast, or "no data").

use thiserror::Error;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The acting user lacks the required role.
    Permission,
    /// A field is missing, out of range, or exceeds available stock.
    Validation,
    /// A referenced record is not present in the current collection.
    LookupMiss,
    /// The key-value backend or JSON encoding failed.
    Storage,
    /// Configuration, environment or I/O failure while booting.
    Startup,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Only managers can {action}")]
    PermissionDenied { action: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("You can't transfer more than {available} of {item} (requested {requested})")]
    InsufficientStock {
        item: String,
        available: u32,
        requested: u32,
    },

    #[error("Inventory item not found: {id}")]
    ItemNotFound { id: String },

    #[error("Sale not found: {id}")]
    SaleNotFound { id: String },

    #[error("Menu item not found: {id}")]
    MenuItemNotFound { id: String },

    #[error("Unknown bar: {id}")]
    UnknownBar { id: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Shorthand for a per-field validation failure.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a rejected manager-only action.
    pub fn permission(action: impl Into<String>) -> Self {
        Self::PermissionDenied {
            action: action.into(),
        }
    }

    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::PermissionDenied { .. } | Self::InvalidCredentials => {
                ErrorCategory::Permission
            }
            Self::Validation { .. } | Self::InsufficientStock { .. } | Self::UnknownBar { .. } => {
                ErrorCategory::Validation
            }
            Self::ItemNotFound { .. } | Self::SaleNotFound { .. } | Self::MenuItemNotFound { .. } => {
                ErrorCategory::LookupMiss
            }
            Self::Storage { .. } | Self::Database(_) | Self::Serialization(_) => {
                ErrorCategory::Storage
            }
            Self::Config { .. } | Self::Io(_) | Self::EnvVar(_) => ErrorCategory::Startup,
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_message_names_action() {
        let err = Error::permission("delete inventory items");
        assert_eq!(err.to_string(), "Only managers can delete inventory items");
        assert_eq!(err.category(), ErrorCategory::Permission);
    }

    #[test]
    fn test_categories_follow_taxonomy() {
        assert_eq!(
            Error::validation("name", "Name is required").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            Error::InsufficientStock {
                item: "Vodka".to_string(),
                available: 10,
                requested: 15,
            }
            .category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            Error::ItemNotFound { id: "x".to_string() }.category(),
            ErrorCategory::LookupMiss
        );
        assert_eq!(
            Error::Storage {
                message: "poisoned".to_string()
            }
            .category(),
            ErrorCategory::Storage
        );
    }
}
