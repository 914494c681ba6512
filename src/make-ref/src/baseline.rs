use std::path::Path;

use anyhow::Result;
use log::info;

use located_error::LocatedError;
use simseqgen_io::read::read_sequence;

const NUCLEOTIDES: [u8; 4] = *b"ACGT";

/// Baseline sequence upon which the alleles of every haplotype are applied.
///
/// - `reference`: first record of a user-provided FASTA file.
/// - otherwise  : pseudo-random sequence. When no `seed` is provided, one is drawn and logged so that the
///   run can be reproduced using `--seed`.
pub fn baseline_sequence(reference: Option<&Path>, seed: Option<u64>, length: usize) -> Result<Vec<u8>> {
    if let Some(path) = reference {
        info!("Using {} as baseline sequence", path.display());
        return read_sequence(path, length).loc("While fetching baseline sequence")
    }

    let seed = seed.unwrap_or_else(|| fastrand::u64(..));
    info!("Generating a random {length} bp baseline sequence using seed {seed}");
    Ok(random_sequence(length, seed))
}

/// `length` nucleotides drawn uniformly from `{A, C, G, T}`
pub fn random_sequence(length: usize, seed: u64) -> Vec<u8> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..length).map(|_| NUCLEOTIDES[rng.usize(..NUCLEOTIDES.len())]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn random_sequence_is_seeded() {
        let seq = random_sequence(1000, 42);
        assert_eq!(seq.len(), 1000);
        assert!(seq.iter().all(|nuc| NUCLEOTIDES.contains(nuc)));
        assert_eq!(seq, random_sequence(1000, 42));
        assert_ne!(seq, random_sequence(1000, 43));
    }

    #[test]
    fn every_nucleotide_is_drawn() {
        let seq = random_sequence(1000, 7);
        for nuc in NUCLEOTIDES {
            assert!(seq.contains(&nuc), "{} never drawn", nuc as char);
        }
    }

    #[test]
    fn baseline_from_fasta() -> Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let path = tmpdir.path().join("baseline.fa");
        std::fs::write(&path, ">chr1\nacgtac\ngtac\n")?;
        assert_eq!(baseline_sequence(Some(&path), Some(1), 10)?, b"ACGTACGTAC".to_vec());
        assert!(baseline_sequence(Some(&path), None, 12).is_err());
        Ok(())
    }

    #[test]
    fn baseline_from_seed() -> Result<()> {
        assert_eq!(baseline_sequence(None, Some(3), 50)?, random_sequence(50, 3));
        assert_eq!(baseline_sequence(None, None, 50)?.len(), 50);
        Ok(())
    }
}
