//! Outbound publish capability.
//!
//! The dispatcher only needs something that can take a built
//! `PublishRequest` and return the message id assigned by the service.
//! `SnsPublisher` is the AWS implementation; tests substitute their own.

mod sns;

use async_trait::async_trait;

use crate::error::PublisherError;
use crate::notification::PublishRequest;

pub use sns::SnsPublisher;

/// Sends a single request to the notification service
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish once and return the service-assigned message id
    async fn send(&self, request: &PublishRequest) -> Result<String, PublisherError>;
}
