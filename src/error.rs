/// Errors raised while editing, importing or persisting a distribution.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("token {position} is not a number: {token:?}")]
    InvalidNumber { position: usize, token: String },

    #[error("import text contains no values")]
    EmptyImport,

    #[error("cannot remove the last remaining probability")]
    LastEntry,

    #[error("index {index} out of range for {len} probabilities")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("storage error: {message}")]
    Storage { message: String },

    #[error("snapshot is not a JSON array of numbers: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl From<std::io::Error> for EditorError {
    fn from(err: std::io::Error) -> Self {
        EditorError::Storage {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;
