use thiserror::Error;

use crate::notification::Strategy;

/// Errors that escape `Dispatcher::publish`.
///
/// Everything else that can go wrong during a publish is logged and reported
/// as `Ok(false)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Publish parameters are required")]
    MissingParameters,
}

/// A required field for the selected strategy is absent or unusable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{strategy} publish requires a topic ARN")]
    MissingTopicArn { strategy: Strategy },

    #[error("FIFO publish requires a non-nil message group id")]
    MissingMessageGroupId,

    #[error("Standard publish requires a multi-protocol payload")]
    MissingPayload,

    #[error("Standard publish requires a non-empty default message")]
    EmptyDefaultMessage,

    #[error("SMS publish requires a phone number")]
    MissingPhoneNumber,
}

/// Failures reported by a `Publisher` implementation
#[derive(Error, Debug)]
pub enum PublisherError {
    #[error("Notification service error: {0}")]
    Service(String),

    #[error("Notification service returned no message id")]
    MissingMessageId,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Operational failure inside a single publish. Never returned to callers.
#[derive(Error, Debug)]
pub(crate) enum PublishFailure {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The request could not be built; nothing was sent
    #[error("Failed to build request: {0}")]
    Request(PublisherError),

    /// The publisher was called and failed
    #[error(transparent)]
    Publisher(PublisherError),
}

impl PublishFailure {
    /// Whether the failure came back from a call to the notification service
    pub(crate) fn reached_service(&self) -> bool {
        matches!(self, PublishFailure::Publisher(_))
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
