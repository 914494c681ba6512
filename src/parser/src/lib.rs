use std::{
    fs::File,
    path::{Path, PathBuf},
    fmt::{self, Display, Formatter},
    ffi::OsStr,
};

use located_error::prelude::*;

use clap::{Parser, Subcommand, Args};
use serde::{Serialize, Deserialize};
use log::debug;

mod error;
pub use error::ParserError;

#[derive(Parser, Debug, Serialize, Deserialize)]
#[clap(name="simseqgen", author, version, about, long_about = None)]
#[clap(propagate_version = true)]
/// simseqgen: Generate VCF and FASTA sequence data from simulated tree sequences.
pub struct Cli {
    ///Set the verbosity level (-v -vv -vvv)
    ///
    /// Set the verbosity level of this program. Multiple levels allowed {n}
    ///
    /// -v: Info  |  -vv: Debug  | -vvv: Trace {n}
    ///
    /// Note that the program will still output warnings by default, even when this flag is off.
    /// Use The --quiet/-q to disable them
    #[clap(short='v', long, parse(from_occurrences), global=true)]
    pub verbose: u8,

    /// Disable warnings.
    ///
    /// By default, warnings are emitted and redirected to the console, even when verbose mode is off.
    /// Use this argument to disable this. Only errors will be displayed.
    #[clap(short='q', long, global=true)]
    pub quiet: bool,

    #[clap(subcommand)]
    pub commands: Commands,
}

impl Cli {
    /// Logger verbosity requested by the user. `--quiet` takes precedence over `--verbose`.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {0} else {self.verbose.saturating_add(1)}
    }

    /// Serialize command line arguments within a `.yaml` file.
    ///
    /// # Behavior
    /// - File naming follows the convention '{current time}-{module name}.yaml'. current time follows the format
    ///   `YYYY`-`MM`-`DD`T`hhmmss`
    /// - File is written at the root of the user-provided `--outdir` folder.
    /// - Commands which do not produce any output file (`repo`, `from-yaml`) are not serialized.
    ///
    /// # Errors
    /// - if `serde_yaml` fails to parse `Self` to a string.
    /// - if the output `.yaml` file cannot be written.
    pub fn serialize(&self) -> Result<Option<PathBuf>> {
        let output_dir = match &self.commands {
            Commands::MakeRef { args } => &args.outdir,
            Commands::Repo { .. } | Commands::FromYaml { .. } => return Ok(None),
        };

        let serialized = serde_yaml::to_string(&self)
            .loc("Failed to serialize command line arguments")?;
        debug!("\n---- Command line args ----\n{}\n---", serialized);

        let current_time = chrono::offset::Local::now().format("%Y-%m-%dT%H%M%S").to_string();
        let output_file  = output_dir.join(format!("{current_time}-{}.yaml", self.commands.name()));

        std::fs::write(&output_file, serialized)
            .with_loc(|| format!("Unable to serialize arguments into {}", output_file.display()))?;
        Ok(Some(output_file))
    }

    /// Deserialize a `.yaml` file into Command line arguments.
    ///
    /// # Errors
    /// - if the provided `.yaml` does not exist, or does not carry read permissions
    /// - if `serde_yaml` fails to parse the provided file to `Self`.
    pub fn deserialize(yaml: &Path) -> Result<Self> {
        let loc_msg = || format!("Unable to deserialize arguments from {}", yaml.display());
        let file = File::open(yaml).with_loc(loc_msg)?;
        serde_yaml::from_reader::<_, Self>(file).with_loc(loc_msg)
    }
}

#[derive(Subcommand, Debug, Serialize, Deserialize)]
pub enum Commands {
    /// Generate a bgzipped VCF and FASTA haplotype sequences from a tree sequence.
    ///
    /// Optionally designate one individual as the reference. Genotypes are then flipped so that its first
    /// haplotype reads as reference at every site.
    #[clap(alias = "make_ref")]
    MakeRef {
        #[clap(flatten)]
        args: MakeRef
    },

    /// Browse the repository of bundled demographic models.
    Repo {
        #[clap(flatten)]
        args: Repo
    },

    /// Run simseqgen using a previously generated .yaml configuration file.
    ///
    /// This allows users to easily re-apply a simseqgen command using the exact same parameters
    /// and arguments.
    FromYaml {
        yaml: PathBuf,
    },
}

impl Commands {
    /// Kebab-case name of the command, as found within serialized argument files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MakeRef { .. }  => "make-ref",
            Self::Repo { .. }     => "repo",
            Self::FromYaml { .. } => "from-yaml",
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeRef {
    /// Input tree sequence.
    ///
    /// Either a tskit binary '.trees' file, or a directory of tskit text tables (nodes.txt, edges.txt,
    /// sites.txt, mutations.txt and optionally populations.txt, sequence_length.txt)
    #[clap(parse(try_from_os_str=valid_input_path))]
    pub ts: PathBuf,

    /// Designate an individual as the reference, using the format <population>:<index>
    ///
    /// <population> is either a population name or a numeric population id. <index> is the 0-based index
    /// of the individual within this population. e.g. 'YRI:0', or '1:0'
    #[clap(short='r', long, alias = "reference_chromosome")]
    pub reference_chromosome: Option<String>,

    /// Output file prefix.
    #[clap(short='p', long, default_value("simseqgen"))]
    pub prefix: String,

    /// Output directory. Created if missing.
    #[clap(short='o', long, default_value("."), parse(try_from_os_str=valid_output_dir))]
    pub outdir: PathBuf,

    /// Write every haplotype sequence within its own '<record-id>.fasta' file.
    #[clap(short='s', long)]
    pub single_fasta: bool,

    /// Use the first record of a FASTA file as the baseline sequence.
    ///
    /// Its length must match the sequence length of the tree sequence. When unspecified, a pseudo-random
    /// baseline sequence is generated.
    #[clap(long, parse(try_from_os_str=valid_input_file))]
    pub reference_sequence: Option<PathBuf>,

    /// Seed of the pseudo-random baseline sequence.
    ///
    /// A random seed is picked, and logged, when unspecified.
    #[clap(long)]
    pub seed: Option<u64>,

    /// Number of BGZF compression threads.
    #[clap(short='@', long, default_value("1"))]
    pub threads: usize,

    /// Overwrite existing output files.
    #[clap(short='w', long)]
    pub overwrite: bool,
}

impl MakeRef {
    /// Path of an output file, located within `--outdir`
    pub fn output_file(&self, filename: &str) -> PathBuf {
        self.outdir.join(filename)
    }

    /// `<outdir>/<prefix><suffix>`
    pub fn prefixed_output(&self, suffix: &str) -> PathBuf {
        self.output_file(&format!("{}{suffix}", self.prefix))
    }

    /// Check if a given file already exists ; raise an error if such is the case, and the user did not explicitly
    /// allow file overwriting.
    ///
    /// # Errors
    /// - If the provided `path` already exists and the user did not specifically allow for file
    ///   overwrite using the `--overwrite` argument
    pub fn can_write_file(&self, path: &Path) -> Result<()> {
        if !self.overwrite && path.exists() {
            return Err(ParserError::CannotOverwrite(path.display().to_string()))
                .loc("While checking for output file permissions")
        }
        Ok(())
    }
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    /// List the available demographic models.
    #[clap(long)]
    pub ls: bool,

    /// Print the demes specification of a given model.
    #[clap(long)]
    pub show: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEntity {File, Directory, Any}

impl Display for FileEntity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::File      => write!(f, "File"),
            Self::Directory => write!(f, "Directory"),
            Self::Any       => write!(f, "Path"),
        }
    }
}

impl FileEntity {
    fn validate(self, path: &Path) -> Result<(), ParserError> {
        use ParserError::InvalidFileEntity;
        let valid = match self {
            Self::File      => path.is_file(),
            Self::Directory => path.is_dir(),
            Self::Any       => true,
        };

        if valid {
            Ok(())
        } else {
            Err(InvalidFileEntity(self, path.display().to_string()))
        }
    }
}

fn assert_filesystem_entity_is_valid(s: &OsStr, entity: FileEntity) -> Result<()> {
    use ParserError::MissingFileEntity;
    let path = Path::new(s);
    if ! path.exists() {
        return Err(MissingFileEntity(entity, path.display().to_string()))
            .loc("While parsing arguments.")
    }

    entity.validate(path).loc("While parsing arguments.")
}

fn valid_input_path(s: &OsStr) -> Result<PathBuf> {
    assert_filesystem_entity_is_valid(s, FileEntity::Any)
        .loc("While checking for input validity")?;
    Ok(PathBuf::from(s))
}

fn valid_input_file(s: &OsStr) -> Result<PathBuf> {
    assert_filesystem_entity_is_valid(s, FileEntity::File)
        .loc("While checking for file validity")?;
    Ok(PathBuf::from(s))
}

fn valid_output_dir(s: &OsStr) -> Result<PathBuf> {
    if ! Path::new(s).exists() {
        std::fs::create_dir_all(s)
            .with_loc(|| format!("While creating output directory {}", Path::new(s).display()))?;
    }
    assert_filesystem_entity_is_valid(s, FileEntity::Directory)
        .loc("While checking for directory validity")?;
    Ok(PathBuf::from(s))
}
