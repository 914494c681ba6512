use std::io::{BufWriter, Write};

use anyhow::Result;

use located_error::LocatedError;

use crate::vcf::{VcfHeader, VcfRecord};

mod error;
pub use error::VcfWriterError;

/// Buffered VCF writer, over any output (plain file, BGZF stream).
pub struct VcfWriter<W: Write> {
    inner  : BufWriter<W>,
    samples: usize,
    records: usize,
}

impl<W: Write> VcfWriter<W> {
    /// Create a new writer and write `header`.
    pub fn new(inner: W, header: &VcfHeader) -> Result<Self> {
        let mut inner = BufWriter::new(inner);
        writeln!(inner, "{header}")
            .map_err(VcfWriterError::Write)
            .loc("While writing VCF header")?;
        Ok(Self { inner, samples: header.samples().len(), records: 0 })
    }

    /// # Errors
    /// - `SampleCountMismatch` if `record` does not carry exactly one call per header sample.
    pub fn write_record(&mut self, record: &VcfRecord) -> Result<()> {
        if record.calls.len() != self.samples {
            return Err(VcfWriterError::SampleCountMismatch{expected: self.samples, found: record.calls.len()})
                .with_loc(|| format!("While writing VCF record at position {}", record.pos))
        }
        writeln!(self.inner, "{record}")
            .map_err(VcfWriterError::Write)
            .with_loc(|| format!("While writing VCF record at position {}", record.pos))?;
        self.records += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Flush the internal buffer and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.inner.into_inner()
            .map_err(|err| VcfWriterError::Write(err.into_error()))
            .loc("While flushing VCF writer")
    }
}
