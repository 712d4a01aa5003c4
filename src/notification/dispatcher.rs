use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::error::{DispatchError, PublishFailure, Result};
use crate::metrics::PublishMetrics;
use crate::publisher::Publisher;

use super::{DeliveryType, Dispatch, PublishParameters, Strategy};

/// Statistics for the dispatcher
#[derive(Debug, Default)]
pub struct DispatcherStats {
    /// Publishes that passed the parameter precondition
    pub total_attempted: AtomicU64,
    /// Publishes acknowledged with a message id
    pub total_published: AtomicU64,
    /// Publishes the service rejected or that failed in transit
    pub total_failed: AtomicU64,
    /// Publishes stopped by validation before any request was sent
    pub total_rejected: AtomicU64,
    pub fifo_publishes: AtomicU64,
    pub standard_publishes: AtomicU64,
    pub sms_publishes: AtomicU64,
}

impl DispatcherStats {
    fn record_attempt(&self, strategy: Strategy) {
        self.total_attempted.fetch_add(1, Ordering::Relaxed);
        let counter = match strategy {
            Strategy::Fifo => &self.fifo_publishes,
            Strategy::Standard => &self.standard_publishes,
            Strategy::Sms => &self.sms_publishes,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            total_attempted: self.total_attempted.load(Ordering::Relaxed),
            total_published: self.total_published.load(Ordering::Relaxed),
            total_failed: self.total_failed.load(Ordering::Relaxed),
            total_rejected: self.total_rejected.load(Ordering::Relaxed),
            fifo_publishes: self.fifo_publishes.load(Ordering::Relaxed),
            standard_publishes: self.standard_publishes.load(Ordering::Relaxed),
            sms_publishes: self.sms_publishes.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of dispatcher statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatcherStatsSnapshot {
    pub total_attempted: u64,
    pub total_published: u64,
    pub total_failed: u64,
    pub total_rejected: u64,
    pub fifo_publishes: u64,
    pub standard_publishes: u64,
    pub sms_publishes: u64,
}

/// Routes publishes to the FIFO, standard or SMS shape and sends them once.
///
/// Holds no per-call state; share it behind an `Arc` across tasks.
pub struct Dispatcher {
    publisher: Arc<dyn Publisher>,
    stats: DispatcherStats,
}

impl Dispatcher {
    pub fn new(publisher: Arc<dyn Publisher>) -> Self {
        Self {
            publisher,
            stats: DispatcherStats::default(),
        }
    }

    /// Get dispatcher statistics
    pub fn stats(&self) -> DispatcherStatsSnapshot {
        self.stats.snapshot()
    }

    /// Publish `parameters` using the shape selected by `delivery_type`.
    ///
    /// Returns `Err` only when `parameters` is absent. Validation and
    /// service failures are logged and reported as `Ok(false)`.
    pub async fn publish(
        &self,
        parameters: Option<&PublishParameters>,
        delivery_type: DeliveryType,
    ) -> Result<bool> {
        let parameters = parameters.ok_or(DispatchError::MissingParameters)?;
        Ok(self.dispatch(parameters, delivery_type).await)
    }

    /// Same as `publish`, with the delivery type given as a text tag.
    ///
    /// An unknown tag yields `Ok(false)` without logging or sending anything.
    pub async fn publish_tagged(
        &self,
        parameters: Option<&PublishParameters>,
        delivery_type: &str,
    ) -> Result<bool> {
        let parameters = parameters.ok_or(DispatchError::MissingParameters)?;

        match delivery_type.parse::<DeliveryType>() {
            Ok(delivery_type) => Ok(self.dispatch(parameters, delivery_type).await),
            Err(_) => Ok(false),
        }
    }

    #[tracing::instrument(
        name = "dispatcher.dispatch",
        skip(self, parameters),
        fields(delivery_type = %delivery_type, strategy = %delivery_type.strategy())
    )]
    async fn dispatch(&self, parameters: &PublishParameters, delivery_type: DeliveryType) -> bool {
        let strategy = delivery_type.strategy();
        self.stats.record_attempt(strategy);
        let started = Instant::now();

        match self.try_publish(parameters, delivery_type).await {
            Ok(message_id) => {
                self.stats.total_published.fetch_add(1, Ordering::Relaxed);
                PublishMetrics::record_published(strategy);
                PublishMetrics::observe_latency(strategy, started.elapsed().as_secs_f64());

                tracing::info!(message_id = %message_id, "Message published");
                true
            }
            Err(PublishFailure::Validation(e)) => {
                self.stats.total_rejected.fetch_add(1, Ordering::Relaxed);
                PublishMetrics::record_rejected(strategy);

                tracing::error!(error = %e, "Publish parameters rejected");
                false
            }
            Err(e) => {
                self.stats.total_failed.fetch_add(1, Ordering::Relaxed);
                PublishMetrics::record_failed(strategy);
                if e.reached_service() {
                    PublishMetrics::observe_latency(strategy, started.elapsed().as_secs_f64());
                }

                tracing::error!(error = %e, "Failed to publish message");
                false
            }
        }
    }

    async fn try_publish(
        &self,
        parameters: &PublishParameters,
        delivery_type: DeliveryType,
    ) -> std::result::Result<String, PublishFailure> {
        let request = Dispatch::from_parameters(parameters, delivery_type)?
            .into_request()
            .map_err(PublishFailure::Request)?;
        self.publisher
            .send(&request)
            .await
            .map_err(PublishFailure::Publisher)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;
    use crate::error::PublisherError;
    use crate::notification::{MultiProtocolPayload, PublishRequest};

    /// Records every request and answers with sequential ids
    #[derive(Default)]
    struct RecordingPublisher {
        requests: Mutex<Vec<PublishRequest>>,
    }

    #[async_trait]
    impl Publisher for RecordingPublisher {
        async fn send(&self, request: &PublishRequest) -> std::result::Result<String, PublisherError> {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            Ok(format!("msg-{}", requests.len()))
        }
    }

    struct FailingPublisher;

    #[async_trait]
    impl Publisher for FailingPublisher {
        async fn send(&self, _request: &PublishRequest) -> std::result::Result<String, PublisherError> {
            Err(PublisherError::Service("throttled".to_string()))
        }
    }

    const TOPIC: &str = "arn:aws:sns:us-east-1:123456789012:topic-test.fifo";

    #[tokio::test]
    async fn test_missing_parameters_is_an_error() {
        let publisher = Arc::new(RecordingPublisher::default());
        let dispatcher = Dispatcher::new(publisher.clone());

        for delivery_type in DeliveryType::ALL {
            let result = dispatcher.publish(None, delivery_type).await;
            assert_eq!(result, Err(DispatchError::MissingParameters));
        }
        assert!(publisher.requests.lock().unwrap().is_empty());
        assert_eq!(dispatcher.stats().total_attempted, 0);
    }

    #[tokio::test]
    async fn test_stats_track_outcomes() {
        let dispatcher = Dispatcher::new(Arc::new(RecordingPublisher::default()));

        let fifo = PublishParameters::new("m")
            .with_topic_arn(TOPIC)
            .with_message_group_id(Uuid::new_v4());
        let sms_without_phone = PublishParameters::new("m");

        assert_eq!(dispatcher.publish(Some(&fifo), DeliveryType::FifoQueue).await, Ok(true));
        assert_eq!(
            dispatcher.publish(Some(&sms_without_phone), DeliveryType::Sms).await,
            Ok(false)
        );

        let stats = dispatcher.stats();
        assert_eq!(stats.total_attempted, 2);
        assert_eq!(stats.total_published, 1);
        assert_eq!(stats.total_rejected, 1);
        assert_eq!(stats.total_failed, 0);
        assert_eq!(stats.fifo_publishes, 1);
        assert_eq!(stats.sms_publishes, 1);
    }

    #[tokio::test]
    async fn test_publisher_failure_counts_as_failed() {
        let dispatcher = Dispatcher::new(Arc::new(FailingPublisher));
        let params = PublishParameters::new("m")
            .with_topic_arn(TOPIC)
            .with_payload(MultiProtocolPayload::new("d"));

        assert_eq!(dispatcher.publish(Some(&params), DeliveryType::Https).await, Ok(false));

        let stats = dispatcher.stats();
        assert_eq!(stats.total_failed, 1);
        assert_eq!(stats.standard_publishes, 1);
    }

    #[test]
    fn test_only_send_failures_reached_service() {
        let build = PublishFailure::Request(PublisherError::Serialization(
            serde_json::from_str::<u8>("not a number").unwrap_err(),
        ));
        let send = PublishFailure::Publisher(PublisherError::Service("throttled".to_string()));
        let rejected = PublishFailure::Validation(crate::error::ValidationError::MissingPhoneNumber);

        assert!(!build.reached_service());
        assert!(!rejected.reached_service());
        assert!(send.reached_service());
    }

    #[test]
    fn test_publish_from_sync_context() {
        let dispatcher = Dispatcher::new(Arc::new(RecordingPublisher::default()));
        let params = PublishParameters::new("hi").with_phone_number("+15551234567");

        let result = tokio_test::block_on(dispatcher.publish(Some(&params), DeliveryType::Sms));
        assert_eq!(result, Ok(true));
    }

    #[tokio::test]
    async fn test_unknown_tag_is_silent_noop() {
        let publisher = Arc::new(RecordingPublisher::default());
        let dispatcher = Dispatcher::new(publisher.clone());
        let params = PublishParameters::new("m").with_phone_number("+15551234567");

        assert_eq!(dispatcher.publish_tagged(Some(&params), "carrier-pigeon").await, Ok(false));
        assert!(publisher.requests.lock().unwrap().is_empty());
        assert_eq!(dispatcher.stats().total_attempted, 0);

        assert_eq!(dispatcher.publish_tagged(Some(&params), "sms").await, Ok(true));
        assert_eq!(publisher.requests.lock().unwrap().len(), 1);
    }
}
