use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive, e.g.
/// `MYTHICARD_LOG=mythicard=debug`.
pub const LOG_ENV: &str = "MYTHICARD_LOG";

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber for the binary. `MYTHICARD_LOG` wins over
/// `-v` flags. Output goes to stderr, or is appended to `log_file`.
pub fn init_logging(
    verbosity: u8,
    log_file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()?;
        }
        None => {
            builder.with_writer(std::io::stderr).try_init()?;
        }
    }
    Ok(())
}

/// Shorten a credential for log lines: at most the first four characters.
pub fn redact_key(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    if key.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{prefix}…")
    }
}
