use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeshatError {
    #[error("Schema missing: {0}")]
    SchemaMissing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Arrow manipulation error: {0}")]
    Arrow(String),

    #[error("Stream source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, SeshatError>;
