use std::{fs::File, io::{BufRead, BufReader}, path::{Path, PathBuf}};

use clap::Parser;
use gzp::{deflate::Bgzf, par::decompress::ParDecompressBuilder};
use bio::io::fasta;

use super::Fixture;

/// Decompress a BGZF file, and return its lines.
pub fn read_bgzf_lines(path: &Path) -> Vec<String> {
    let file = File::open(path).unwrap_or_else(|_| panic!("Failed to open {}", path.display()));
    let reader = BufReader::new(ParDecompressBuilder::<Bgzf>::new().from_reader(file));
    reader.lines().collect::<Result<_, _>>().expect("valid BGZF file")
}

pub fn read_fasta(path: &Path) -> Vec<fasta::Record> {
    fasta::Reader::from_file(path)
        .unwrap_or_else(|_| panic!("Failed to open {}", path.display()))
        .records()
        .collect::<Result<_, _>>()
        .expect("valid FASTA file")
}

/// Assemble the arguments of a `simseqgen make-ref` invocation, using fixtures from `tests/test-data`.
#[derive(Default)]
pub struct MakeRefRunnerBuilder {
    ts                  : Option<String>,
    prefix              : Option<String>,
    reference_chromosome: Option<String>,
    reference_sequence  : Option<String>,
    seed                : Option<u64>,
    threads             : Option<usize>,
    single_fasta        : bool,
    overwrite           : bool,
}

impl MakeRefRunnerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ts(mut self, ts: &str) -> Self {
        self.ts = Some(ts.to_string());
        self
    }

    pub fn set_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    pub fn set_reference_chromosome(mut self, token: &str) -> Self {
        self.reference_chromosome = Some(token.to_string());
        self
    }

    pub fn set_reference_sequence(mut self, fasta: &str) -> Self {
        self.reference_sequence = Some(fasta.to_string());
        self
    }

    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn set_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn single_fasta(mut self) -> Self {
        self.single_fasta = true;
        self
    }

    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    pub fn build(self) -> Result<MakeRefRunner, String> {
        let ts = Fixture::copy(self.ts.as_deref().ok_or("Missing tree sequence")?);
        let outdir = Fixture::blank("simseqgen-test-output");
        let reference_sequence = self.reference_sequence.as_deref().map(Fixture::copy);
        let prefix = self.prefix.unwrap_or_else(|| "simseqgen".to_string());

        let mut args: Vec<String> = vec!["simseqgen".into(), "make-ref".into(), ts.to_string()];
        args.extend(["--outdir".into(), outdir.to_string(), "--prefix".into(), prefix.clone()]);
        if let Some(token) = self.reference_chromosome {
            args.extend(["--reference-chromosome".into(), token]);
        }
        if let Some(fasta) = &reference_sequence {
            args.extend(["--reference-sequence".into(), fasta.to_string()]);
        }
        if let Some(seed) = self.seed {
            args.extend(["--seed".into(), seed.to_string()]);
        }
        if let Some(threads) = self.threads {
            args.extend(["--threads".into(), threads.to_string()]);
        }
        if self.single_fasta {
            args.push("--single-fasta".into());
        }
        if self.overwrite {
            args.push("--overwrite".into());
        }

        Ok(MakeRefRunner { args, prefix, outdir, _ts: ts, _reference_sequence: reference_sequence })
    }
}

pub struct MakeRefRunner {
    args               : Vec<String>,
    prefix             : String,
    outdir             : Fixture,
    _ts                : Fixture,
    _reference_sequence: Option<Fixture>,
}

impl MakeRefRunner {
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Parse the assembled arguments, and run simseqgen.
    pub fn run(&self) -> anyhow::Result<()> {
        let cli = parser::Cli::try_parse_from(&self.args)?;
        simseqgen::run(cli)
    }

    pub fn outdir(&self) -> &Path {
        &self.outdir
    }

    pub fn output(&self, suffix: &str) -> PathBuf {
        self.outdir.join(format!("{}{suffix}", self.prefix))
    }

    pub fn vcf(&self) -> PathBuf {
        self.output(".vcf.gz")
    }

    pub fn fasta(&self) -> PathBuf {
        self.output(".fasta")
    }

    pub fn reference_fasta(&self) -> PathBuf {
        self.output(".reference.fasta")
    }

    /// `--single-fasta` output file of a given record.
    pub fn record_fasta(&self, record_id: &str) -> PathBuf {
        self.outdir.join(format!("{record_id}.fasta"))
    }

    /// Data lines of the output VCF, as `(REF, ALT, genotype calls)`.
    pub fn vcf_records(&self) -> Vec<(String, String, Vec<String>)> {
        read_bgzf_lines(&self.vcf()).into_iter()
            .filter(|line| !line.starts_with('#'))
            .map(|line| {
                let fields: Vec<&str> = line.split('\t').collect();
                (fields[3].to_string(), fields[4].to_string(), fields[9..].iter().map(ToString::to_string).collect())
            })
            .collect()
    }
}
