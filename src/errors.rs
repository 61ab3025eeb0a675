use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GateError {
    #[error("I/O error: {0}")]
    #[diagnostic(code(portcullis::io))]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    #[diagnostic(code(portcullis::config))]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(portcullis::serde))]
    Serde(#[from] serde_json::Error),

    #[error("JOSE error: {0}")]
    #[diagnostic(code(portcullis::jose))]
    Jose(String),

    #[error("Upstream HTTP error: {0}")]
    #[diagnostic(code(portcullis::http))]
    Http(String),

    #[error("{0}")]
    #[diagnostic(code(portcullis::other))]
    Other(String),
}

impl From<josekit::JoseError> for GateError {
    fn from(value: josekit::JoseError) -> Self {
        GateError::Jose(value.to_string())
    }
}

impl From<reqwest::Error> for GateError {
    fn from(value: reqwest::Error) -> Self {
        GateError::Http(value.to_string())
    }
}
