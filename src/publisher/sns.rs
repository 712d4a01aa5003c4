use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::Client;

use crate::config::AwsConfig;
use crate::error::PublisherError;
use crate::notification::{PublishRequest, PublishTarget};

use super::Publisher;

/// `Publisher` backed by the AWS SNS `Publish` API
#[derive(Clone)]
pub struct SnsPublisher {
    client: Client,
}

impl SnsPublisher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default credential chain, pinned to the
    /// configured region and optional endpoint override
    pub async fn from_settings(config: &AwsConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        tracing::info!(
            region = %config.region,
            endpoint = ?config.endpoint_url,
            "SNS client configured"
        );

        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl Publisher for SnsPublisher {
    async fn send(&self, request: &PublishRequest) -> Result<String, PublisherError> {
        let mut builder = self
            .client
            .publish()
            .message(request.message.clone())
            .subject(request.subject.clone())
            .set_message_group_id(request.message_group_id.clone())
            .set_message_structure(
                request.message_structure.map(|s| s.as_str().to_string()),
            );

        builder = match &request.target {
            PublishTarget::Topic(arn) => builder.topic_arn(arn.clone()),
            PublishTarget::Phone(number) => builder.phone_number(number.clone()),
        };

        let output = builder
            .send()
            .await
            .map_err(|e| PublisherError::Service(DisplayErrorContext(&e).to_string()))?;

        output
            .message_id()
            .map(str::to_string)
            .ok_or(PublisherError::MissingMessageId)
    }
}
