use thiserror::Error;

/// Errors raised while loading engine or scene configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_message_names_field() {
        let e = ConfigError::invalid("trail_length", "must be at least 1");
        assert_eq!(e.to_string(), "invalid `trail_length`: must be at least 1");
    }

    #[test]
    fn wraps_serde_errors() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let e: ConfigError = err.into();
        assert!(e.to_string().starts_with("malformed config JSON"));
    }
}
