//! Log output for the server.
//!
//! Everything goes through `tracing`: request spans, worker lifecycle events,
//! and the allocation audit trail emitted by [`partseq::TracingLogSink`] under
//! the `partseq::audit` target. The filter is taken from `RUST_LOG` and
//! defaults to `info`, e.g.
//!
//! ```bash
//! RUST_LOG=info,partseq=debug cargo run --bin partseq-tonic-server
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_line_number(true)
                .with_target(true)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true)
                .pretty(),
        )
        .try_init()?;

    Ok(())
}
