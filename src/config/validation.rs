use thiserror::Error;

use super::models::Config;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("environment must not be empty")]
    EmptyEnvironment,

    #[error("fetch.max_attempts must be at least 1")]
    NoFetchAttempts,

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("subset.subset_command must not be empty")]
    EmptySubsetCommand,

    #[error("subset.convert_command must not be empty")]
    EmptyConvertCommand,

    #[error("storage.bucket must not be empty")]
    EmptyBucket,

    #[error("fetch.max_font_bytes must be greater than zero")]
    ZeroFontLimit,
}

pub fn validate(config: &Config) -> Result<(), ValidationError> {
    if config.environment.trim().is_empty() {
        return Err(ValidationError::EmptyEnvironment);
    }

    if config.fetch.max_attempts == 0 {
        return Err(ValidationError::NoFetchAttempts);
    }
    if config.fetch.attempt_timeout_secs == 0 {
        return Err(ValidationError::ZeroTimeout("fetch.attempt_timeout_secs"));
    }
    if config.fetch.max_font_bytes.as_u64() == 0 {
        return Err(ValidationError::ZeroFontLimit);
    }

    if config.subset.subset_command.trim().is_empty() {
        return Err(ValidationError::EmptySubsetCommand);
    }
    if config.subset.convert_command.trim().is_empty() {
        return Err(ValidationError::EmptyConvertCommand);
    }
    if config.subset.timeout_secs == 0 {
        return Err(ValidationError::ZeroTimeout("subset.timeout_secs"));
    }

    if config.storage.bucket.trim().is_empty() {
        return Err(ValidationError::EmptyBucket);
    }

    if config.pipeline.request_timeout_secs == 0 {
        return Err(ValidationError::ZeroTimeout("pipeline.request_timeout_secs"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn rejects_zero_attempts() {
        let mut config = Config::default();
        config.fetch.max_attempts = 0;
        assert!(matches!(
            validate(&config).unwrap_err(),
            ValidationError::NoFetchAttempts
        ));
    }

    #[test]
    fn rejects_empty_subset_command() {
        let mut config = Config::default();
        config.subset.subset_command = "  ".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ValidationError::EmptySubsetCommand
        ));
    }

    #[test]
    fn rejects_zero_request_timeout() {
        let mut config = Config::default();
        config.pipeline.request_timeout_secs = 0;
        assert!(matches!(
            validate(&config).unwrap_err(),
            ValidationError::ZeroTimeout("pipeline.request_timeout_secs")
        ));
    }

    #[test]
    fn rejects_empty_bucket() {
        let mut config = Config::default();
        config.storage.bucket = String::new();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ValidationError::EmptyBucket
        ));
    }
}
