use std::{fs::File, path::Path};

use anyhow::Result;
use bio::io::fasta;
use log::debug;

use located_error::LocatedError;

mod error;
pub use error::FastaError;

/// Read the first record of a FASTA file, and ensure it spans exactly `expected_len` nucleotides.
///
/// # Errors
/// - `Open` or `ParseRecord` if the file cannot be read or parsed.
/// - `EmptyFasta` if the file does not contain any record.
/// - `SequenceLengthMismatch` if the length of the record differs from `expected_len`
pub fn read_sequence(path: &Path, expected_len: usize) -> Result<Vec<u8>> {
    use FastaError::{Open, ParseRecord, EmptyFasta, SequenceLengthMismatch};
    let loc_msg = || format!("While reading FASTA sequence {}", path.display());

    let file = File::open(path).map_err(Open).with_loc(loc_msg)?;
    let record = fasta::Reader::new(file).records()
        .next()
        .ok_or_else(|| EmptyFasta(path.to_path_buf()))
        .with_loc(loc_msg)?
        .map_err(ParseRecord)
        .with_loc(loc_msg)?;

    debug!("Using FASTA record '{}' ({} bp) as baseline sequence", record.id(), record.seq().len());
    if record.seq().len() != expected_len {
        return Err(SequenceLengthMismatch{id: record.id().to_string(), expected: expected_len, got: record.seq().len()})
            .with_loc(loc_msg)
    }
    Ok(record.seq().to_ascii_uppercase())
}
