use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid storage name \"{0}\"")]
    InvalidName(String),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Fixed point not reached within {0} rounds")]
    RoundLimitExceeded(usize),
    #[error("The vertex id {0} does not exist in the graph")]
    GraphVertexNotFound(usize),
    #[error("The edge with head {0} and tail {1} does not exist in the graph")]
    GraphEdgeNotFound(usize, usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Custom(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Error {
        Error::Custom(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}
