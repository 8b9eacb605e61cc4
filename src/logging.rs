//! Structured logging bootstrap using `tracing`.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global tracing subscriber; `RUST_LOG` overrides the `info` default.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_level(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::debug!(level = ?Level::INFO, "tracing initialised");
    Ok(())
}
