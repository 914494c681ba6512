use thiserror::Error;

#[derive(Error, Debug)]
pub enum VcfWriterError {
    #[error("Failed to write to VCF file")]
    Write(#[source] std::io::Error),

    #[error("Found {found} genotype calls, while the header declares {expected} samples")]
    SampleCountMismatch{expected: usize, found: usize},
}
