use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScopedOutputError {
    #[error("Failed to create output file {}", .0.display())]
    Create(PathBuf, #[source] std::io::Error),
}
