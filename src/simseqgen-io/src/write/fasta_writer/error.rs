use thiserror::Error;

#[derive(Error, Debug)]
pub enum FastaWriterError {
    #[error("Failed to write to FASTA file")]
    Write(#[source] std::io::Error),
}
