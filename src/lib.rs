//! simseqgen: convert simulated genealogies into variant calls and haplotype sequences.

use std::io;

use anyhow::Result;
use log::info;

use located_error::LocatedError;
use parser::{Cli, Commands};
use demography::ModelRegistry;

/// Run the subcommand requested by `cli`.
///
/// # Errors
/// Any error raised by the requested subcommand.
pub fn run(cli: Cli) -> Result<()> {
    match cli.commands {
        Commands::MakeRef{args} => {
            make_ref::run(&args)?;
        },

        Commands::Repo{args} => {
            let registry = ModelRegistry::bundled().loc("While loading bundled demographic models")?;
            let stdout = io::stdout();
            demography::run(&args, &registry, &mut stdout.lock())?;
        },

        Commands::FromYaml{yaml} => {
            info!("Replaying arguments serialized within {}", yaml.display());
            let cli = Cli::deserialize(&yaml)?;
            self::run(cli)?;
        },
    }
    Ok(())
}
