//! Prometheus metrics for the purge pipeline.
//!
//! Every recording function is a no-op without the `prometheus` feature.

#[cfg(feature = "prometheus")]
use metrics::counter;
#[cfg(feature = "prometheus")]
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::config::MetricsConfig;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
#[cfg(feature = "prometheus")]
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Ok(());
    }

    let addr: std::net::SocketAddr = config.listen_address.parse().map_err(|e| {
        MetricsError::Setup(format!(
            "invalid listen address '{}': {}",
            config.listen_address, e
        ))
    })?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(MetricsError::Install)?;

    tracing::info!(listen_address = %addr, "Prometheus exporter listening");
    Ok(())
}

/// Initialize the metrics system (no-op without prometheus feature).
#[cfg(not(feature = "prometheus"))]
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if config.enabled {
        tracing::warn!(
            "Metrics are enabled in config but the 'prometheus' feature is not compiled. \
            Rebuild with: cargo build --features prometheus"
        );
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Metric Recording Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Record one batch manifest written by the enumerator.
pub fn record_batch_created(session_count: usize) {
    #[cfg(feature = "prometheus")]
    {
        counter!("purge_batches_created_total").increment(1);
        counter!("purge_sessions_enumerated_total").increment(session_count as u64);
    }
    #[cfg(not(feature = "prometheus"))]
    {
        let _ = session_count;
    }
}

/// Record items deleted from one store ("opensearch", "database", "object_storage").
pub fn record_purge_deletion(store: &str, count: u64) {
    #[cfg(feature = "prometheus")]
    {
        counter!("purge_deleted_total", "store" => store.to_string()).increment(count);
    }
    #[cfg(not(feature = "prometheus"))]
    {
        let _ = (store, count);
    }
}

/// Record a stage failure.
pub fn record_purge_error(stage: &str) {
    #[cfg(feature = "prometheus")]
    {
        counter!("purge_errors_total", "stage" => stage.to_string()).increment(1);
    }
    #[cfg(not(feature = "prometheus"))]
    {
        let _ = stage;
    }
}

/// Record a notification attempt ("sent" or "error").
pub fn record_notification(status: &str) {
    #[cfg(feature = "prometheus")]
    {
        counter!("purge_notifications_total", "status" => status.to_string()).increment(1);
    }
    #[cfg(not(feature = "prometheus"))]
    {
        let _ = status;
    }
}

/// Metrics initialization errors.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Failed to set up metrics: {0}")]
    Setup(String),

    #[cfg(feature = "prometheus")]
    #[error("Failed to install metrics recorder")]
    Install(#[from] metrics_exporter_prometheus::BuildError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_metrics_is_noop() {
        assert!(init_metrics(&MetricsConfig::default()).is_ok());
    }

    #[test]
    #[cfg(feature = "prometheus")]
    fn test_invalid_listen_address() {
        let config = MetricsConfig {
            enabled: true,
            listen_address: "not-an-address".to_string(),
        };
        assert!(matches!(
            init_metrics(&config),
            Err(MetricsError::Setup(_))
        ));
    }

    #[test]
    fn test_recording_without_recorder() {
        record_batch_created(10);
        record_purge_deletion("database", 10);
        record_purge_error("enumerate");
        record_notification("sent");
    }
}
