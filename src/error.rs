use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Malformed geometry data: {0}")]
    MalformedGeometry(#[from] serde_json::Error),
}
