use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage error shared by the markup crates
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
}

impl CommonError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        CommonError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
