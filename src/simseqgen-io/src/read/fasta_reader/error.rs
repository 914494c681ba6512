use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Failed to open FASTA file")]
    Open(#[source] std::io::Error),

    #[error("Failed to parse FASTA record")]
    ParseRecord(#[source] std::io::Error),

    #[error("{} does not contain any FASTA record", .0.display())]
    EmptyFasta(PathBuf),

    #[error("The length of FASTA record '{id}' ({got} bp) does not match the sequence length of the tree sequence ({expected} bp)")]
    SequenceLengthMismatch{id: String, expected: usize, got: usize},
}
