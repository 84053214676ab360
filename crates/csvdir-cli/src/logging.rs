//! Logging setup for the CLI
//!
//! Log lines go to stderr so table output on stdout stays clean. `RUST_LOG`
//! takes precedence over the `-v` count.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Map the number of `-v` flags to a level
pub fn level_from_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global fmt subscriber
pub fn init_logging(verbose: u8) {
    let level = level_from_verbosity(verbose);

    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Our crates at the requested level, everything else at warn
        EnvFilter::new(format!(
            "warn,csvdir={level},csvdir_core={level}",
            level = level.as_str().to_lowercase()
        ))
    })
}
