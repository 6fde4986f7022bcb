use crate::error::{Error, Result};
use std::io::IsTerminal;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;

/// Installs the diagnostic subscriber at the level `-v`/`-vv` selects (§10.2): warn by default,
/// debug at one `-v`, trace at two or more.
pub(crate) fn initialize(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let enable_ansi = std::io::stderr().is_terminal();
    let filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    tracing_subscriber::fmt()
        .with_ansi(enable_ansi)
        .with_level(true)
        .with_target(false)
        .with_thread_names(false)
        .with_timer(fmt::time::uptime())
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .compact()
        .try_init()
        .map_err(|error| Error::Logging(error.to_string()))
}
