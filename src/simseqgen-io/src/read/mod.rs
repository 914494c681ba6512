mod vcf_reader;
pub use vcf_reader::{VcfReader, VcfReaderError};

mod fasta_reader;
pub use fasta_reader::{read_sequence, FastaError};
