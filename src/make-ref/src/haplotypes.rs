use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, info};

use located_error::{LocatedError, LocatedOption};
use genealogy::{TreeSequence, Individual, Partition, Variant};
use simseqgen_io::FastaWriter;

use crate::MakeRefError;

/// Placement of the sample haplotype records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleLayout {
    /// All the records within a single FASTA file.
    Merged(PathBuf),
    /// One `<record-id>.fasta` file per record, within the given directory.
    Single(PathBuf),
}

impl SampleLayout {
    /// Every FASTA file this layout will write for `samples`.
    pub fn outputs(&self, samples: &[&Individual]) -> Vec<PathBuf> {
        match self {
            Self::Merged(path)  => vec![path.clone()],
            Self::Single(dir) => samples.iter()
                .flat_map(|ind| (0..ind.ploidy()).map(|haplotype| dir.join(format!("{}.fasta", ind.record_id(haplotype)))))
                .collect(),
        }
    }
}

enum SampleSink<'a> {
    Merged(FastaWriter),
    Single{dir: &'a Path, written: Vec<PathBuf>},
}

impl<'a> SampleSink<'a> {
    fn new(layout: &'a SampleLayout) -> Result<Self> {
        match layout {
            SampleLayout::Merged(path) => Ok(Self::Merged(FastaWriter::new(path)?)),
            SampleLayout::Single(dir)  => Ok(Self::Single{dir, written: Vec::new()}),
        }
    }

    fn write(&mut self, id: &str, description: &str, seq: &[u8]) -> Result<()> {
        match self {
            Self::Merged(writer) => writer.write_record(id, Some(description), seq),
            Self::Single{dir, written} => {
                let mut writer = FastaWriter::new(&dir.join(format!("{id}.fasta")))?;
                writer.write_record(id, Some(description), seq)?;
                written.push(writer.finish()?);
                Ok(())
            },
        }
    }

    fn finish(self) -> Result<Vec<PathBuf>> {
        match self {
            Self::Merged(writer)     => Ok(vec![writer.finish()?]),
            Self::Single{written, ..} => Ok(written),
        }
    }
}

/// `id:<id>, node:<node>, name:<name>, haplotype:<h>, population:<popname>`
pub fn record_description(individual: &Individual, haplotype: usize) -> String {
    let node = individual.nodes.get(haplotype).map_or_else(|| ".".to_string(), ToString::to_string);
    format!("id:{}, node:{node}, name:{}, haplotype:{haplotype}, population:{}",
        individual.metadata.id, individual.metadata.name, individual.metadata.popname
    )
}

/// Single byte nucleotide of every allele of a site.
fn nucleotides(variant: &Variant) -> Result<Vec<u8>, MakeRefError> {
    variant.alleles.iter().map(|allele| match allele.as_bytes() {
        [nucleotide] => Ok(*nucleotide),
        _ => Err(MakeRefError::NonAsciiAllele{site: variant.site, allele: allele.clone()}),
    }).collect()
}

/// One sequence per haplotype node of `individual`: `baseline`, where the nucleotide found at each site
/// is replaced by the allele carried by the haplotype.
pub fn haplotype_sequences(ts: &TreeSequence, individual: &Individual, baseline: &[u8]) -> Result<Vec<Vec<u8>>> {
    let loc_msg = || format!("While materializing the haplotypes of {}", individual.metadata.tskit_id);
    let mut sequences = vec![baseline.to_vec(); individual.ploidy()];
    for variant in ts.variants(&individual.nodes) {
        if variant.position >= baseline.len() {
            return Err(MakeRefError::SiteOutOfBounds{site: variant.site, position: variant.position, length: baseline.len()})
                .with_loc(loc_msg)
        }
        let nucleotides = nucleotides(&variant).with_loc(loc_msg)?;
        for (seq, allele) in sequences.iter_mut().zip(&variant.genotypes) {
            seq[variant.position] = nucleotides[*allele];
        }
    }
    Ok(sequences)
}

/// Write the first haplotype of the reference individual into `reference_output` (if any), and every
/// haplotype of the sample individuals according to `layout`. Returns the paths of all the written files.
pub fn write_haplotypes(
    ts              : &TreeSequence,
    partition       : &Partition,
    baseline        : &[u8],
    reference_output: &Path,
    layout          : &SampleLayout,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if let Some(reference) = partition.reference {
        let sequences = haplotype_sequences(ts, reference, baseline)?;
        let seq = sequences.first()
            .with_loc(|| format!("Reference individual {} carries no haplotype", reference.metadata.tskit_id))?;
        let mut writer = FastaWriter::new(reference_output)?;
        writer.write_record(&reference.record_id(0), Some(&record_description(reference, 0)), seq)?;
        written.push(writer.finish()?);
        info!("Wrote reference haplotype {} into {}", reference.record_id(0), reference_output.display());
    }

    let progress = logger::Logger::progress_bar(partition.samples.len() as u64, "Writing haplotypes");
    let mut sink = SampleSink::new(layout)?;
    let mut records = 0;
    for individual in &partition.samples {
        debug!("Materializing {} ({} haplotypes)", individual.metadata.name, individual.ploidy());
        for (haplotype, seq) in haplotype_sequences(ts, individual, baseline)?.iter().enumerate() {
            sink.write(&individual.record_id(haplotype), &record_description(individual, haplotype), seq)?;
            records += 1;
        }
        progress.inc(1);
    }
    let outputs = sink.finish()?;
    progress.finish_and_clear();
    info!("Wrote {records} sample haplotypes into {} FASTA file(s)", outputs.len());

    written.extend(outputs);
    Ok(written)
}
