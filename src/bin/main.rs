use std::process;
use clap::Parser;

use log::error;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Parse command line arguments and run `simseqgen::run()`
fn main() {
    // ----------------------------- Run CLI Parser
    let cli = parser::Cli::parse();

    // ----------------------------- Init logger.
    if let Err(e) = logger::Logger::init(cli.verbosity()) {
        eprintln!("Failed to initialize logger: {e}");
        process::exit(1);
    }

    // ----------------------------- Serialize command line arguments
    if let Err(e) = cli.serialize() {
        error!("{e:?}");
        process::exit(1);
    }

    // ----------------------------- unpack Cli and run the appropriate modules.
    if let Err(e) = simseqgen::run(cli) {
        error!("{e:?}");
        process::exit(1);
    }
}
