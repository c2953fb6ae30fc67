//! Tracing subscriber setup for the CLI.

use tracing_subscriber::{EnvFilter, fmt};

/// Default filter directive for the given flags
pub fn default_directive(
    verbose: u8,
    quiet: bool,
) -> &'static str
{
    if quiet
    {
        return "error";
    }

    match verbose
    {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install a stderr subscriber. `RUST_LOG` wins over the flags.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(
    verbose: u8,
    quiet: bool,
)
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
