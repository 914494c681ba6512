pub mod vcf;
pub use vcf::{VcfHeader, VcfRecord, GenotypeCall, VcfError};

pub mod read;
pub use read::{VcfReader, VcfReaderError, FastaError};

pub mod write;
pub use write::{ScopedOutput, VcfWriter, VcfWriterError, BgzfWriter, FastaWriter};
