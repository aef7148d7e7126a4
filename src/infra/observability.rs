//! Logging and metrics bootstrap.

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;

/// Prometheus handle for on-demand scrape output.
pub type PrometheusHandle = metrics_exporter_prometheus::PrometheusHandle;

/// Install the global tracing subscriber.
///
/// Filtering comes from `RUST_LOG` with an `info` default; `json`
/// switches to structured output for log shippers.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Install the global metrics recorder and return a handle for rendering.
///
/// Uses `PrometheusBuilder` without an HTTP listener; the embedding
/// application renders scrape output with `handle.render()`.
///
/// # Errors
/// Returns an error if a recorder is already installed or building fails.
pub fn init_metrics() -> Result<PrometheusHandle, metrics_exporter_prometheus::BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}
