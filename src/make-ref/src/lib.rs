//! `make-ref`: convert a tree sequence into a BGZF compressed VCF + haplotype FASTA sequences.
//!
//! Genotypes may be expressed relative to a designated reference individual: at every site where the first
//! haplotype of that individual carries a non-zero allele, allele codes are exchanged so that it reads `0`.

use std::path::PathBuf;

use anyhow::Result;
use log::{info, warn};

use located_error::LocatedError;
use genealogy::{TreeSequence, ReferenceToken, Partition, individual};
use parser::MakeRef;

mod error;
pub use error::MakeRefError;

pub mod baseline;
pub mod export;
pub use export::ExportSummary;

pub mod haplotypes;
pub use haplotypes::SampleLayout;

#[cfg(test)]
pub(crate) mod test_utils;

/// Files written by a [`run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outputs {
    pub vcf  : ExportSummary,
    pub fasta: Vec<PathBuf>,
}

/// Run `make-ref`.
///
/// # Errors
/// - if the tree sequence cannot be loaded, or if its individuals are not grouped by population.
/// - `InvalidReferenceToken` / `ReferenceNotFound` if `--reference-chromosome` is malformed or matches nobody.
/// - `CannotOverwrite` if any output file exists and `--overwrite` was not requested. This check is carried
///   out before anything is written.
/// - any I/O error on the outputs. Partially written outputs are removed.
pub fn run(args: &MakeRef) -> Result<Outputs> {
    // ---- Load the tree sequence and annotate its individuals.
    let ts = TreeSequence::load(&args.ts)?;
    let mut individuals = individual::annotate(&ts).loc("While annotating individuals")?;
    if individuals.is_empty() {
        warn!("{} does not carry any individual. Output files will not contain any sample", args.ts.display());
    }

    if let Some(token) = &args.reference_chromosome {
        let token: ReferenceToken = token.parse().loc("While parsing --reference-chromosome")?;
        token.designate(&mut individuals).loc("While designating the reference individual")?;
    }
    let partition = Partition::new(&individuals);

    // ---- Ensure no existing file gets overwritten.
    let vcf_output       = args.prefixed_output(".vcf.gz");
    let reference_output = args.prefixed_output(".reference.fasta");
    let layout = match args.single_fasta {
        true  => SampleLayout::Single(args.outdir.clone()),
        false => SampleLayout::Merged(args.prefixed_output(".fasta")),
    };

    let mut outputs = vec![vcf_output.clone()];
    if partition.reference.is_some() {
        outputs.push(reference_output.clone());
    }
    outputs.extend(layout.outputs(&partition.samples));
    for path in &outputs {
        args.can_write_file(path)?;
    }

    let baseline = baseline::baseline_sequence(args.reference_sequence.as_deref(), args.seed, ts.discrete_length())?;

    // ---- Variants
    let tmp = export::write_temporary_vcf(&ts, &individuals)?;
    let vcf = export::export_vcf(tmp.path(), &individuals, partition.reference, &vcf_output, args.threads)?;
    tmp.close().loc("While removing temporary VCF file")?;

    // ---- Haplotype sequences
    let fasta = haplotypes::write_haplotypes(&ts, &partition, &baseline, &reference_output, &layout)?;

    info!("Done. Results written in {}", args.outdir.display());
    Ok(Outputs { vcf, fasta })
}
