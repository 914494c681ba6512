use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, info};
use tempfile::NamedTempFile;

use located_error::{LocatedError, LocatedOption};
use genealogy::{TreeSequence, Individual, Variant, NodeId};
use simseqgen_io::{VcfHeader, VcfRecord, GenotypeCall, VcfReader, VcfWriter, BgzfWriter};

use crate::MakeRefError;

/// Name of the single contig of every exported VCF.
pub const CONTIG: &str = "1";

/// Outcome of [`export_vcf`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path   : PathBuf,
    pub records: usize,
    pub flipped: usize,
}

fn vcf_header(ts: &TreeSequence, individuals: &[Individual]) -> VcfHeader {
    let samples = individuals.iter().map(|ind| ind.metadata.tskit_id.clone()).collect();
    let mut header = VcfHeader::new(samples);
    header.push_meta("##fileformat=VCFv4.2");
    header.push_meta(format!("##source=simseqgen-{}", env!("CARGO_PKG_VERSION")));
    header.push_meta("##FILTER=<ID=PASS,Description=\"All filters passed\">");
    header.push_meta(format!("##contig=<ID={CONTIG},length={}>", ts.discrete_length()));
    header.push_meta("##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">");
    header
}

/// Convert a variant into a VCF record. `variant.genotypes` must follow the node order of `individuals`.
fn vcf_record(variant: &Variant, individuals: &[Individual]) -> VcfRecord {
    let mut genotypes = variant.genotypes.iter().copied();
    let calls = individuals.iter()
        .map(|ind| GenotypeCall::phased(genotypes.by_ref().take(ind.ploidy())))
        .collect();

    VcfRecord {
        chrom    : CONTIG.to_string(),
        pos      : variant.position as u64 + 1,
        id       : variant.site.to_string(),
        reference: variant.alleles[0].clone(),
        alternate: variant.alleles[1..].to_vec(),
        qual     : ".".to_string(),
        filter   : "PASS".to_string(),
        info     : ".".to_string(),
        calls,
    }
}

/// Write the raw genotypes of all `individuals` into a plain-text temporary VCF. The file is deleted once
/// the returned handle is dropped.
pub fn write_temporary_vcf(ts: &TreeSequence, individuals: &[Individual]) -> Result<NamedTempFile> {
    let loc_msg = "While writing temporary VCF file";
    let mut tmp = tempfile::Builder::new()
        .prefix("simseqgen-")
        .suffix(".vcf")
        .tempfile()
        .loc(loc_msg)?;

    let nodes: Vec<NodeId> = individuals.iter().flat_map(|ind| ind.nodes.iter().copied()).collect();
    let mut writer = VcfWriter::new(&mut tmp, &vcf_header(ts, individuals)).loc(loc_msg)?;
    for variant in ts.variants(&nodes) {
        writer.write_record(&vcf_record(&variant, individuals)).loc(loc_msg)?;
    }
    debug!("Wrote {} records into temporary VCF file", writer.records());
    writer.into_inner().loc(loc_msg)?;
    Ok(tmp)
}

/// Make the first haplotype of the sample at `column` read as reference. Returns `true` if the record
/// had to be flipped.
///
/// # Errors
/// `MissingReferenceCall` if that haplotype carries a missing call.
pub fn flip_to_reference(record: &mut VcfRecord, column: usize, reference: &Individual) -> Result<bool> {
    let k = record.first_call(column)
        .ok_or_else(|| MakeRefError::MissingReferenceCall(reference.metadata.tskit_id.clone(), record.pos))
        .loc("While flipping VCF record")?;
    if k == 0 {
        return Ok(false)
    }
    let pos = record.pos;
    record.swap_reference(k)
        .with_loc(|| format!("While flipping VCF record at position {pos}"))?;
    Ok(true)
}

/// Re-read `temporary`, and write its records into the BGZF compressed `output`, along with one
/// `##SAMPLE` line per individual. When a `reference` individual is provided, every record is flipped so
/// that its first haplotype reads `0`.
pub fn export_vcf(
    temporary  : &Path,
    individuals: &[Individual],
    reference  : Option<&Individual>,
    output     : &Path,
    threads    : usize
) -> Result<ExportSummary> {
    let loc_msg = || format!("While exporting VCF file {}", output.display());
    let mut reader = VcfReader::new(temporary, 1).with_loc(loc_msg)?;

    let mut header = reader.header().clone();
    for individual in individuals {
        header.push_meta(&individual.metadata.vcf_header);
    }

    let reference = reference.map(|ind| {
        header.sample_index(&ind.metadata.tskit_id)
            .map(|column| (column, ind))
            .with_loc(|| format!("Reference individual {} is missing from the VCF header", ind.metadata.tskit_id))
    }).transpose()?;

    let bgzf = BgzfWriter::new(output, threads).with_loc(loc_msg)?;
    let mut writer = VcfWriter::new(bgzf, &header).with_loc(loc_msg)?;
    let mut flipped = 0;
    while let Some(mut record) = reader.next_record().with_loc(loc_msg)? {
        if let Some((column, individual)) = reference {
            flipped += usize::from(flip_to_reference(&mut record, column, individual)?);
        }
        writer.write_record(&record).with_loc(loc_msg)?;
    }

    let records = writer.records();
    let path = writer.into_inner().with_loc(loc_msg)?.finish()?;
    match reference {
        Some((_, ind)) => info!("Wrote {records} records into {}. {flipped} were flipped to match {}", path.display(), ind.metadata.tskit_id),
        None           => info!("Wrote {records} records into {}", path.display()),
    }
    Ok(ExportSummary { path, records, flipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;
    use genealogy::individual;
    use pretty_assertions::assert_eq;

    fn read_all(path: &Path) -> Result<(VcfHeader, Vec<VcfRecord>)> {
        let mut reader = VcfReader::new(path, 1)?;
        let mut records = Vec::new();
        while let Some(record) = reader.next_record()? {
            records.push(record);
        }
        Ok((reader.header().clone(), records))
    }

    fn calls(record: &VcfRecord) -> Vec<String> {
        record.calls.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn temporary_vcf() -> Result<()> {
        let ts = test_utils::two_demes();
        let individuals = individual::annotate(&ts)?;
        let tmp = write_temporary_vcf(&ts, &individuals)?;
        let (header, records) = read_all(tmp.path())?;

        assert_eq!(header.samples(), ["tsk_0", "tsk_1", "tsk_2", "tsk_3"]);
        assert!(header.meta().contains(&"##contig=<ID=1,length=20>".to_string()));
        assert_eq!(records.iter().map(|r| r.pos).collect::<Vec<_>>(), vec![3, 8, 13, 16]);
        assert_eq!((records[0].reference.as_str(), records[0].alternate.clone()), ("A", vec!["T".to_string()]));
        assert_eq!(calls(&records[0]), ["1|1", "0|0", "0|0", "0|0"]);
        assert_eq!(calls(&records[1]), ["0|0", "0|0", "0|0", "1|1"]);
        assert_eq!(calls(&records[2]), ["1|1", "1|0", "0|0", "0|0"]);
        assert_eq!(calls(&records[3]), ["0|0", "1|0", "0|0", "0|0"]);
        Ok(())
    }

    #[test]
    fn temporary_vcf_is_scoped() -> Result<()> {
        let ts = test_utils::two_demes();
        let individuals = individual::annotate(&ts)?;
        let path = write_temporary_vcf(&ts, &individuals)?.path().to_path_buf();
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn export_without_reference() -> Result<()> {
        let ts = test_utils::two_demes();
        let individuals = individual::annotate(&ts)?;
        let tmp = write_temporary_vcf(&ts, &individuals)?;
        let tmpdir = tempfile::tempdir()?;
        let output = tmpdir.path().join("out.vcf.gz");

        let summary = export_vcf(tmp.path(), &individuals, None, &output, 1)?;
        assert_eq!(summary, ExportSummary { path: output.clone(), records: 4, flipped: 0 });

        let (header, records) = read_all(&output)?;
        let (_, raw) = read_all(tmp.path())?;
        assert_eq!(records, raw);
        let sample_lines: Vec<&String> = header.meta().iter().filter(|line| line.starts_with("##SAMPLE=")).collect();
        assert_eq!(sample_lines.len(), 4);
        assert_eq!(sample_lines[2], &individuals[2].metadata.vcf_header);
        Ok(())
    }

    #[test]
    fn export_with_reference() -> Result<()> {
        let ts = test_utils::two_demes();
        let mut individuals = individual::annotate(&ts)?;
        let idx = "A:0".parse::<genealogy::ReferenceToken>()?.designate(&mut individuals)?;
        let tmp = write_temporary_vcf(&ts, &individuals)?;
        let tmpdir = tempfile::tempdir()?;
        let output = tmpdir.path().join("out.vcf.gz");

        let summary = export_vcf(tmp.path(), &individuals, Some(&individuals[idx]), &output, 2)?;
        assert_eq!(summary.flipped, 2);

        let (_, records) = read_all(&output)?;
        assert!(records.iter().all(|record| record.first_call(0) == Some(0)));
        assert_eq!((records[0].reference.as_str(), records[0].alternate.clone()), ("T", vec!["A".to_string()]));
        assert_eq!(calls(&records[0]), ["0|0", "1|1", "1|1", "1|1"]);
        assert_eq!(calls(&records[1]), ["0|0", "0|0", "0|0", "1|1"]);
        assert_eq!(calls(&records[2]), ["0|0", "0|1", "1|1", "1|1"]);
        assert_eq!(records[3].reference, "G");
        Ok(())
    }

    #[test]
    fn flip_multiallelic() -> Result<()> {
        let ts = test_utils::two_demes();
        let individuals = individual::annotate(&ts)?;
        let mut record: VcfRecord = "1\t5\t0\tA\tG,T\t.\tPASS\t.\tGT\t2|0\t1|2\t.|2".parse()?;
        assert!(flip_to_reference(&mut record, 0, &individuals[0])?);
        assert_eq!((record.reference.as_str(), record.alternate.clone()), ("T", vec!["G".to_string(), "A".to_string()]));
        assert_eq!(calls(&record), ["0|2", "1|0", ".|0"]);
        assert!(!flip_to_reference(&mut record, 0, &individuals[0])?);
        Ok(())
    }

    #[test]
    fn missing_reference_call() -> Result<()> {
        let ts = test_utils::two_demes();
        let individuals = individual::annotate(&ts)?;
        let mut record: VcfRecord = "1\t5\t0\tA\tG\t.\tPASS\t.\tGT\t.|1".parse()?;
        let err = flip_to_reference(&mut record, 0, &individuals[0]).expect_err("missing call");
        assert_eq!(err.downcast_ref::<MakeRefError>(), Some(&MakeRefError::MissingReferenceCall("tsk_0".to_string(), 5)));
        Ok(())
    }
}
