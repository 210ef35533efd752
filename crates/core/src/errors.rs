use thiserror::Error;

use crate::config::ConfigError;

/// Failures at the boundary of the engine. Classification itself never fails;
/// these cover loading configuration and decoding records.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error("configuration failure: {0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("serialization failure: {0}")]
    Serialization(String),
}

impl ApplicationError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "config",
            Self::InvalidInput(_) => "input",
            Self::Serialization(_) => "serialization",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 2,
            Self::InvalidInput(_) => 3,
            Self::Serialization(_) => 4,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "The configuration could not be loaded. Check visor.toml.",
            Self::InvalidInput(_) => "The procedure record could not be read. Check the input.",
            Self::Serialization(_) => "The result could not be rendered.",
        }
    }
}

impl From<ConfigError> for ApplicationError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value.to_string())
    }
}

impl From<serde_json::Error> for ApplicationError {
    fn from(value: serde_json::Error) -> Self {
        if value.is_io() {
            Self::InvalidInput(value.to_string())
        } else if value.is_syntax() || value.is_eof() || value.is_data() {
            Self::InvalidInput(format!("malformed json: {value}"))
        } else {
            Self::Serialization(value.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::config::ConfigError;
    use crate::errors::ApplicationError;

    #[test]
    fn config_errors_map_to_configuration_class() {
        let error = ApplicationError::from(ConfigError::MissingConfigFile(PathBuf::from(
            "visor.toml",
        )));

        assert_eq!(error.error_class(), "config");
        assert_eq!(error.exit_code(), 2);
        assert!(error.to_string().contains("visor.toml"));
    }

    #[test]
    fn malformed_json_is_invalid_input() {
        let parse = serde_json::from_str::<serde_json::Value>("{\"folio\":");
        let error = match parse {
            Ok(value) => panic!("expected a parse failure, got {value}"),
            Err(error) => ApplicationError::from(error),
        };

        assert_eq!(error.error_class(), "input");
        assert_eq!(error.exit_code(), 3);
        assert!(error.to_string().starts_with("invalid input: malformed json"));
    }

    #[test]
    fn user_messages_do_not_leak_details() {
        let error = ApplicationError::Serialization("recursion limit exceeded".to_owned());
        assert_eq!(error.exit_code(), 4);
        assert!(!error.user_message().contains("recursion"));
    }
}
