use crate::config::PreprocessConfig;
use std::{env, str::FromStr};
use tracing::debug;
use tracing_subscriber::filter::EnvFilter;

const RUST_LOG: &str = "RUST_LOG";
const HUMAN_LOGGING: &str = "HUMAN_LOGGING";

/// Initialize the logging context for a host embedding the pre-processing engine.
pub fn init_logging(config: &PreprocessConfig) -> anyhow::Result<()> {
    let filter = match env::var_os(RUST_LOG) {
        Some(_) => EnvFilter::try_from_default_env()?,
        None => {
            let level = if config.verbose {
                "debug"
            } else {
                config.log_level.as_str()
            };
            EnvFilter::try_new(level)?
        }
    };

    let human_logging = match env::var(HUMAN_LOGGING) {
        Ok(s) => bool::from_str(&s).map_err(|_| {
            anyhow::anyhow!("Expected `true` or `false` to be provided for `{HUMAN_LOGGING}`")
        })?,
        Err(_) => true,
    };

    let sub = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    if human_logging {
        sub.with_ansi(true)
            .with_level(true)
            .with_line_number(true)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
    } else {
        sub.with_ansi(false)
            .with_level(true)
            .with_line_number(true)
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
    }

    debug!("Logging initialized at level {}", config.log_level);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_installs_subscriber_once() {
        let config = PreprocessConfig::default();

        assert!(init_logging(&config).is_ok());
        // A global subscriber is already set.
        assert!(init_logging(&config).is_err());
    }
}
