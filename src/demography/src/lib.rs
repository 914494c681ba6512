//! Registry of demographic models (`demes` YAML specifications), and the `repo` subcommand.

use std::io::Write;

use anyhow::Result;
use log::warn;

use located_error::LocatedError;

mod graph;
pub use graph::{Graph, Deme, Epoch, Migration, Pulse};

mod error;
pub use error::RegistryError;

mod registry;
pub use registry::{Model, ModelRegistry};

/// Run the `repo` subcommand: list the models of `registry` and/or print the specification of one of them
/// into `out`.
///
/// # Errors
/// - `ModelNotFound` if `--show` targets an unregistered model.
/// - if `out` cannot be written to.
pub fn run<W: Write>(args: &parser::Repo, registry: &ModelRegistry, out: &mut W) -> Result<()> {
    if !args.ls && args.show.is_none() {
        warn!("Nothing to do. Use `--ls` to list the available models, or `--show <MODEL>` to print one.");
        return Ok(())
    }

    if args.ls {
        registry.list(out).loc("While listing demographic models")?;
    }

    if let Some(name) = &args.show {
        let model = registry.get(name).loc("While running the `repo` subcommand")?;
        write!(out, "{}", model.yaml)
            .and_then(|()| if model.yaml.ends_with('\n') {Ok(())} else {writeln!(out)})
            .with_loc(|| format!("While printing demographic model '{name}'"))?;
    }
    out.flush().loc("While flushing `repo` output")?;
    Ok(())
}
