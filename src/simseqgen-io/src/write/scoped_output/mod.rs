use std::{fs::{self, File}, path::{Path, PathBuf}};

use anyhow::Result;
use log::{trace, warn};

use located_error::LocatedError;

mod error;
pub use error::ScopedOutputError;

/// Guard over a newly created output file.
///
/// The file is removed when the guard is dropped without having been committed, i.e. whenever its writer
/// fails or is abandoned midway, so that no partially written output is left behind.
#[derive(Debug)]
pub struct ScopedOutput {
    path     : PathBuf,
    committed: bool,
}

impl ScopedOutput {
    /// Create (or truncate) `path`, returning the guard along with the file handle.
    ///
    /// # Errors
    /// if `path` is either an invalid file, or the user does not have the proper UNIX permissions to write
    /// at this location.
    pub fn create(path: &Path) -> Result<(Self, File)> {
        let file = File::create(path)
            .map_err(|err| ScopedOutputError::Create(path.to_path_buf(), err))
            .loc("While creating output file")?;
        trace!("Created output file {}", path.display());
        Ok((Self { path: path.to_path_buf(), committed: false }, file))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the file on disk.
    pub fn commit(mut self) -> PathBuf {
        self.committed = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for ScopedOutput {
    fn drop(&mut self) {
        if self.committed {
            return
        }
        match fs::remove_file(&self.path) {
            Ok(())   => warn!("Removed incomplete output file {}", self.path.display()),
            Err(err) => warn!("Failed to remove incomplete output file {} [{err}]", self.path.display()),
        }
    }
}
