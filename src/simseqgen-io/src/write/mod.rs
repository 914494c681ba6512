mod scoped_output;
pub use scoped_output::{ScopedOutput, ScopedOutputError};

mod vcf_writer;
pub use vcf_writer::{VcfWriter, VcfWriterError};

mod bgzf_writer;
pub use bgzf_writer::{BgzfWriter, BgzfWriterError};

mod fasta_writer;
pub use fasta_writer::{FastaWriter, FastaWriterError};
