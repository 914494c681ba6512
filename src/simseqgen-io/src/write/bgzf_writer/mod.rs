use std::{io::{self, Write}, path::{Path, PathBuf}};

use anyhow::Result;
use gzp::{deflate::Bgzf, par::compress::{ParCompress, ParCompressBuilder}, GzpError, ZWriter};
use log::{debug, error};

use located_error::LocatedError;

use crate::write::ScopedOutput;

mod error;
pub use error::BgzfWriterError;

/// Flush and join the compression threads. On failure, the compressor is leaked: `ParCompress` panics when
/// dropped unfinished.
fn close(mut inner: ParCompress<Bgzf>) -> Result<(), GzpError> {
    let result = inner.finish();
    if result.is_err() {
        std::mem::forget(inner);
    }
    result
}

/// BGZF compressed output file, using `threads` compression threads.
///
/// The file is removed if the writer is dropped before [`BgzfWriter::finish`] succeeds.
pub struct BgzfWriter {
    inner: Option<ParCompress<Bgzf>>,
    guard: Option<ScopedOutput>,
}

impl BgzfWriter {
    /// # Errors
    /// - if `threads` is 0
    /// - if the output file cannot be created.
    pub fn new(path: &Path, threads: usize) -> Result<Self> {
        let loc_msg = || format!("While creating BGZF output file {}", path.display());
        let builder = Self::builder(threads).with_loc(loc_msg)?;
        let (guard, file) = ScopedOutput::create(path).with_loc(loc_msg)?;
        debug!("Writing BGZF file {} using {threads} compression thread(s)", path.display());
        Ok(Self { inner: Some(builder.from_writer(file)), guard: Some(guard) })
    }

    fn builder(threads: usize) -> Result<ParCompressBuilder<Bgzf>, BgzfWriterError> {
        ParCompressBuilder::<Bgzf>::new()
            .num_threads(threads)
            .map_err(BgzfWriterError::Compression)
    }

    /// Flush all pending blocks, write the BGZF EOF marker, and keep the file on disk.
    pub fn finish(mut self) -> Result<PathBuf> {
        let guard = self.guard.take().expect("guard is only taken by finish");
        let loc_msg = || format!("While finalizing BGZF output file {}", guard.path().display());
        if let Some(inner) = self.inner.take() {
            close(inner).map_err(BgzfWriterError::Compression).with_loc(loc_msg)?;
        }
        Ok(guard.commit())
    }

    fn compressor(&mut self) -> io::Result<&mut ParCompress<Bgzf>> {
        self.inner.as_mut().ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "BGZF writer is closed"))
    }
}

impl Write for BgzfWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.compressor()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.compressor()?.flush()
    }
}

impl Drop for BgzfWriter {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            if let Err(err) = close(inner) {
                let path = self.guard.as_ref().map_or_else(Default::default, |guard| guard.path().display().to_string());
                error!("Failed to close BGZF output file {path} [{err}]");
            }
        }
    }
}
