use thiserror::Error;

/// Errores del modelo de plan de job.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DomainError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid plan: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_variant_format() {
        let err = DomainError::Configuration("job name missing".into());
        assert_eq!(err.to_string(), "configuration error: job name missing");
    }
}
