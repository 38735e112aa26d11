use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Invalid analysis payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("Analysis payload must be a JSON object, got {0}")]
    UnexpectedPayload(&'static str),

    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),

    #[error("Layout configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
