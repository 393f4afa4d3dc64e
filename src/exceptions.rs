use thiserror::Error;

#[derive(Error, Debug)]
pub enum RestitchError {
    #[error("Could not find content to replace for conflict marker. Context: {0}...")]
    ContextNotFound(String),

    #[error("Could not locate diff hunk in original content. Context: {0}...")]
    DiffContext(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
