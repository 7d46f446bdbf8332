//! Tracing subscriber setup for the `lapse` binary.
//!
//! Logs go to stderr so stdout stays clean for reports and `--json` output.
//! `RUST_LOG` (also read from a `.env` file) overrides the default filter.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_cli_logger(verbose: bool) {
    let default_directive = if verbose { "lapse_fit=debug" } else { "lapse_fit=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A caller embedding the library may already have installed a global subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
