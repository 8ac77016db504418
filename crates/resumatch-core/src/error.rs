use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The embedding model failed to load at startup. Fatal; not retried.
    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    /// The vector store could not be opened or created. Fatal for both
    /// read and write paths.
    #[error("Vector index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
