use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::LevelFilter;
use log::Level;
use env_logger::{Builder, Env, fmt::Color};
use std::io::Write;
use std::sync::OnceLock;
use thiserror::Error;

static INSTANCE: OnceLock<Logger> = OnceLock::new();

/// Environment variable overriding the command line verbosity (e.g. `SIMSEQGEN_LOG=debug`).
pub const LOG_ENV_VAR: &str = "SIMSEQGEN_LOG";

const PROGRESS_TEMPLATE: &str = "{msg:<24} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>6}/{len:6} ({eta})";

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Failed to wrap logger with a multi-progress bar")]
    Wrap(#[from] log::SetLoggerError),

    #[error("Logger was already initialized")]
    AlreadyInitialized,
}

#[derive(Debug)]
pub struct Logger {
    multi_pg: MultiProgress,
}

impl Logger {

    /// Initialize the global logger.
    ///
    /// `verbosity` maps to a level filter: 0=Error, 1=Warn, 2=Info, 3=Debug, 4+=Trace.
    /// `SIMSEQGEN_LOG` takes precedence when set.
    pub fn init(verbosity: u8) -> Result<(), LoggerError> {
        let log_level = Self::u8_to_loglevel(verbosity);
        let env = Env::default()
            .filter(LOG_ENV_VAR);

        let logger = Builder::new().filter_level(log_level)
            .format(|buf, record| {
                let (traceback, set_intensity) = match record.level() {
                    Level::Error => (
                        format!("(@ {}:{}) ", record.file().unwrap_or("unknown"), record.line().unwrap_or(0)),
                        true
                    ),
                    _ => (String::new(), false)
                };

                let mut arg_style = buf.style();
                arg_style.set_intense(set_intensity);

                let mut level_style = buf.style();
                let color = match record.level() {
                    Level::Error => Color::Red,
                    Level::Warn  => Color::Yellow,
                    Level::Info  => Color::Green,
                    Level::Debug => Color::Blue,
                    Level::Trace => Color::Cyan
                };
                level_style.set_color(color).set_bold(true);

                writeln!(
                    buf,
                    "[{} {: <5} {}] {traceback}{}",
                    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                    level_style.value(record.level()),
                    record.target(),
                    arg_style.value(record.args())
                )
            })
            .parse_env(env)
            .build();

        let multi_pg = MultiProgress::new();
        LogWrapper::new(multi_pg.clone(), logger).try_init()?;
        log::set_max_level(log_level);
        INSTANCE.set(Self{multi_pg}).map_err(|_| LoggerError::AlreadyInitialized)
    }

    fn u8_to_loglevel(verbosity: u8) -> LevelFilter {
        match verbosity {
            0            => LevelFilter::Error,
            1            => LevelFilter::Warn,
            2            => LevelFilter::Info,
            3            => LevelFilter::Debug,
            4..= u8::MAX => LevelFilter::Trace
        }
    }

    pub fn set_level(verbosity: u8) {
        log::set_max_level(Self::u8_to_loglevel(verbosity));
    }

    /// Return the shared `MultiProgress`, if the logger was initialized.
    pub fn multi() -> Option<&'static MultiProgress> {
        INSTANCE.get().map(|logger| &logger.multi_pg)
    }

    /// Create a progress bar of length `len`.
    ///
    /// The bar is registered within the logger's `MultiProgress` so that log records are printed above it.
    /// When the logger is uninitialized (library use, tests) or the log level is below `Info`, a hidden bar
    /// is returned.
    pub fn progress_bar(len: u64, message: &'static str) -> ProgressBar {
        let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");

        match Self::multi() {
            Some(multi) if log::max_level() >= LevelFilter::Info => {
                multi.add(ProgressBar::new(len).with_style(style).with_message(message))
            },
            _ => ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::hidden()),
        }
    }
}
