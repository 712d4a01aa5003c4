//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use crate::notification::Strategy;

use super::{PUBLISH_LATENCY, PUBLISH_TOTAL};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording publish metrics
pub struct PublishMetrics;

impl PublishMetrics {
    pub fn record_published(strategy: Strategy) {
        PUBLISH_TOTAL
            .with_label_values(&[strategy.as_str(), "published"])
            .inc();
    }

    pub fn record_failed(strategy: Strategy) {
        PUBLISH_TOTAL
            .with_label_values(&[strategy.as_str(), "failed"])
            .inc();
    }

    /// Record a publish stopped before any request was sent
    pub fn record_rejected(strategy: Strategy) {
        PUBLISH_TOTAL
            .with_label_values(&[strategy.as_str(), "rejected"])
            .inc();
    }

    pub fn observe_latency(strategy: Strategy, seconds: f64) {
        PUBLISH_LATENCY
            .with_label_values(&[strategy.as_str()])
            .observe(seconds);
    }
}
