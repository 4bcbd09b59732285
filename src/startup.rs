use crate::config::Config;
use crate::error::other_error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging, `RUST_LOG` taking precedence over the configured filter
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_logging(default_filter: &str) -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    Ok(Config::load()?)
}
