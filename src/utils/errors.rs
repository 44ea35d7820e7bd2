use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to write upload {0:?}")]
    Write(std::path::PathBuf, #[source] io::Error),
    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
