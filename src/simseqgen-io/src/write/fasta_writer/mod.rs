use std::{fs::File, path::{Path, PathBuf}};

use anyhow::Result;
use bio::io::fasta;

use located_error::LocatedError;

use crate::write::ScopedOutput;

mod error;
pub use error::FastaWriterError;

/// FASTA output file. Removed if dropped before [`FastaWriter::finish`] succeeds.
pub struct FastaWriter {
    inner  : fasta::Writer<File>,
    guard  : ScopedOutput,
    records: usize,
}

impl FastaWriter {
    pub fn new(path: &Path) -> Result<Self> {
        let (guard, file) = ScopedOutput::create(path)
            .with_loc(|| format!("While creating FASTA output file {}", path.display()))?;
        Ok(Self { inner: fasta::Writer::new(file), guard, records: 0 })
    }

    pub fn write_record(&mut self, id: &str, description: Option<&str>, seq: &[u8]) -> Result<()> {
        self.inner.write(id, description, seq)
            .map_err(FastaWriterError::Write)
            .with_loc(|| format!("While writing FASTA record {id} into {}", self.guard.path().display()))?;
        self.records += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Flush the writer and keep the file on disk.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.inner.flush()
            .map_err(FastaWriterError::Write)
            .with_loc(|| format!("While flushing FASTA output file {}", self.guard.path().display()))?;
        Ok(self.guard.commit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_records() -> Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let path = tmpdir.path().join("out.fasta");
        let mut writer = FastaWriter::new(&path)?;
        writer.write_record("tsk_0-0", Some("id:0, node:0"), b"ACGT")?;
        writer.write_record("tsk_0-1", None, b"TTGA")?;
        assert_eq!(writer.records(), 2);
        writer.finish()?;

        let records = fasta::Reader::from_file(&path)?.records().collect::<Result<Vec<_>, _>>()?;
        assert_eq!(records.len(), 2);
        assert_eq!((records[0].id(), records[0].desc(), records[0].seq()), ("tsk_0-0", Some("id:0, node:0"), &b"ACGT"[..]));
        assert_eq!((records[1].id(), records[1].desc(), records[1].seq()), ("tsk_0-1", None, &b"TTGA"[..]));
        Ok(())
    }

    #[test]
    fn unfinished_writer_removes_output() -> Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let path = tmpdir.path().join("out.fasta");
        {
            let mut writer = FastaWriter::new(&path)?;
            writer.write_record("tsk_0-0", None, b"ACGT")?;
        }
        assert!(!path.exists());
        Ok(())
    }
}
