use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
    #[error("upstream error: {0}")]
    Upstream(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Whether the caller caused the failure (bad input) rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_)
                | ServiceError::NotFound(_)
                | ServiceError::Model(models::errors::ModelError::Validation(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn classifies_client_errors() {
        assert!(ServiceError::Validation("x".into()).is_client_error());
        assert!(ServiceError::not_found("file").is_client_error());
        assert!(ServiceError::from(ModelError::Validation("x".into())).is_client_error());
        assert!(!ServiceError::from(ModelError::Db("x".into())).is_client_error());
        assert!(!ServiceError::Db("x".into()).is_client_error());
        assert!(!ServiceError::Upstream("x".into()).is_client_error());
    }

    #[test]
    fn not_found_message() {
        assert_eq!(ServiceError::not_found("file").to_string(), "not found: file not found");
    }
}
