//! Entry point of the `unb` project utility.

use clams::{Error, cli, command::CommandError};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "UNB_LOG";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();

    match cli::build().and_then(|cli| cli.dispatch_env()) {
        Ok(()) => {}
        Err(Error::Usage(err)) => err.exit(),
        Err(Error::Handler(err)) => {
            if let Some(cmd_err) = err.downcast_ref::<CommandError>() {
                tracing::debug!("{cmd_err}");
                std::process::exit(cmd_err.exit_code());
            }
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.exit_code());
        }
    }
}
