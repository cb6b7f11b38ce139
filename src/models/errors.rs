use thiserror::Error;

/// Repository-level errors for storage access operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Persistent storage is unavailable in this context")]
    Unavailable,

    #[error("Storage I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("Invalid storage key: {key}")]
    InvalidKey { key: String },
}

/// Validation errors for incoming product data
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredField { field: String },

    #[error("Invalid field value: {field}={value}, reason={reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Value out of range: {field}, min={min}, max={max}, value={value}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
        value: String,
    },
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError::InvalidValue {
            field: "product".to_string(),
            value: String::new(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result type alias for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = RepositoryError::InvalidKey {
            key: "../cart".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid storage key: ../cart");

        let validation_error = ValidationError::RequiredField {
            field: "id".to_string(),
        };
        assert_eq!(validation_error.to_string(), "Required field missing: id");
    }

    #[test]
    fn test_repository_error_from_serde() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json");
        assert!(json_error.is_err());

        let repo_error: RepositoryError = json_error.unwrap_err().into();
        match repo_error {
            RepositoryError::Serialization { .. } => {}
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_repository_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let repo_error: RepositoryError = io_error.into();
        assert!(matches!(repo_error, RepositoryError::Io { .. }));
        assert!(repo_error.to_string().contains("denied"));
    }

    #[test]
    fn test_validation_error_from_serde() {
        let json_error = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let validation_error: ValidationError = json_error.into();
        match validation_error {
            ValidationError::InvalidValue { field, .. } => assert_eq!(field, "product"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
