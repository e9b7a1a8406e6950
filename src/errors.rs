use thiserror::Error;

#[derive(Error, Debug)]
pub enum GifSlimError {
    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("Not a GIF file: {0}")]
    NotAGif(String),

    #[error("Truncated GIF container: {0}")]
    Truncated(String),

    #[error("gifsicle not found - install it and make sure it is on PATH")]
    BackendUnavailable,

    // Per-trial failure, absorbed by the worker pool and recorded on the
    // outcome. Fatal only when every trial fails.
    #[error("Backend invocation failed: {0}")]
    BackendInvocationFailed(String),

    #[error("No trial produced a valid result under the frame constraint")]
    NoValidResults,

    #[error("Temporary storage failed: {0}")]
    TempStorageFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, GifSlimError>;
