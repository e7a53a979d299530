use thiserror::Error;

pub type Result<T> = std::result::Result<T, TouchmapError>;

#[derive(Error, Debug)]
pub enum TouchmapError {
    #[error("GitHub token not found; pass --token or set GITHUB_TOKEN")]
    MissingToken,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("HTTP error: {0}")]
    Http(#[from] Box<ureq::Error>),
    #[error("GitHub API returned {status} for '{file}' page {page}")]
    Status { status: u16, file: String, page: u32 },
    #[error("Rate limit retries exhausted for '{file}' page {page} after {attempts} attempts")]
    RetriesExhausted { file: String, page: u32, attempts: u32 },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("No touch records found in {0}")]
    EmptyDataset(String),
    #[error("Other: {0}")]
    Other(String),
}

// Manual From implementation for unboxed to boxed conversion
impl From<ureq::Error> for TouchmapError {
    fn from(err: ureq::Error) -> Self {
        TouchmapError::Http(Box::new(err))
    }
}
