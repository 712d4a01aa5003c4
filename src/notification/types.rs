use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delivery shape selected by the caller for a single publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryType {
    /// FIFO topic, ordered within a message group
    FifoQueue,
    Http,
    Https,
    Email,
    EmailJson,
    /// Standard (non-FIFO) SQS subscription
    StandardQueue,
    /// Direct SMS to a phone number, no topic involved
    Sms,
}

/// How a publish request is built for a given delivery type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Raw message plus message group id
    Fifo,
    /// JSON envelope with one body per subscriber protocol
    Standard,
    /// Raw message sent to a phone number
    Sms,
}

impl DeliveryType {
    pub const ALL: [DeliveryType; 7] = [
        DeliveryType::FifoQueue,
        DeliveryType::Http,
        DeliveryType::Https,
        DeliveryType::Email,
        DeliveryType::EmailJson,
        DeliveryType::StandardQueue,
        DeliveryType::Sms,
    ];

    pub fn strategy(&self) -> Strategy {
        match self {
            DeliveryType::FifoQueue => Strategy::Fifo,
            DeliveryType::Http
            | DeliveryType::Https
            | DeliveryType::Email
            | DeliveryType::EmailJson
            | DeliveryType::StandardQueue => Strategy::Standard,
            DeliveryType::Sms => Strategy::Sms,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryType::FifoQueue => "fifo-queue",
            DeliveryType::Http => "http",
            DeliveryType::Https => "https",
            DeliveryType::Email => "email",
            DeliveryType::EmailJson => "email-json",
            DeliveryType::StandardQueue => "standard-queue",
            DeliveryType::Sms => "sms",
        }
    }
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a text tag names no known delivery type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown delivery type: {0}")]
pub struct UnknownDeliveryType(pub String);

impl FromStr for DeliveryType {
    type Err = UnknownDeliveryType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase().replace('_', "-");
        DeliveryType::ALL
            .into_iter()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| UnknownDeliveryType(s.to_string()))
    }
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Fifo => "fifo",
            Strategy::Standard => "standard",
            Strategy::Sms => "sms",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message body per subscriber protocol.
///
/// Sent as a JSON envelope; SNS picks the body matching each subscriber's
/// protocol and falls back to `default` for the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiProtocolPayload {
    pub default: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "email-json", default, skip_serializing_if = "Option::is_none")]
    pub email_json: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqs: Option<String>,
}

impl MultiProtocolPayload {
    /// Payload with only the fallback body
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            ..Default::default()
        }
    }

    /// Same body for every protocol
    pub fn uniform(body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            default: body.clone(),
            email: Some(body.clone()),
            email_json: Some(body.clone()),
            http: Some(body.clone()),
            https: Some(body.clone()),
            sqs: Some(body),
        }
    }

    pub fn email(mut self, body: impl Into<String>) -> Self {
        self.email = Some(body.into());
        self
    }

    pub fn email_json(mut self, body: impl Into<String>) -> Self {
        self.email_json = Some(body.into());
        self
    }

    pub fn http(mut self, body: impl Into<String>) -> Self {
        self.http = Some(body.into());
        self
    }

    pub fn https(mut self, body: impl Into<String>) -> Self {
        self.https = Some(body.into());
        self
    }

    pub fn sqs(mut self, body: impl Into<String>) -> Self {
        self.sqs = Some(body.into());
        self
    }

    /// Serialize to the envelope SNS expects with `MessageStructure=json`
    pub fn to_envelope(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Caller-facing parameters for a publish.
///
/// Fields are not checked against any delivery type here; each strategy
/// validates what it needs at dispatch time.
#[derive(Debug, Clone, Default)]
pub struct PublishParameters {
    /// Plain message body for FIFO and SMS deliveries
    pub default_message: String,
    /// Envelope for standard deliveries
    pub payload: Option<MultiProtocolPayload>,
    /// Ordering group for FIFO deliveries
    pub message_group_id: Option<Uuid>,
    /// Replaced by `SUBJECT_EMPTY` when absent
    pub subject: Option<String>,
    pub topic_arn: Option<String>,
    pub phone_number: Option<String>,
}

impl PublishParameters {
    pub fn new(default_message: impl Into<String>) -> Self {
        Self {
            default_message: default_message.into(),
            ..Default::default()
        }
    }

    pub fn with_payload(mut self, payload: MultiProtocolPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_message_group_id(mut self, id: Uuid) -> Self {
        self.message_group_id = Some(id);
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_topic_arn(mut self, topic_arn: impl Into<String>) -> Self {
        self.topic_arn = Some(topic_arn.into());
        self
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }
}
