//! Tracing subscriber bootstrap.

use anyhow::anyhow;
use tracing_subscriber::{fmt, EnvFilter};

use folio_kernel::settings::{LogFormat, TelemetrySettings};

/// Install the global subscriber. `RUST_LOG`, when set, wins over the configured filter.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = filter(settings);

    let result = match settings.log_format {
        LogFormat::Pretty => fmt().with_env_filter(filter).with_target(true).try_init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .try_init(),
    };

    result.map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))?;

    tracing::debug!(format = ?settings.log_format, "telemetry initialized");
    Ok(())
}

fn filter(settings: &TelemetrySettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
