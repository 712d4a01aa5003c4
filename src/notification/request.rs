use uuid::Uuid;

use crate::error::{PublisherError, ValidationError};

use super::{DeliveryType, MultiProtocolPayload, PublishParameters, Strategy};

/// Subject sent when the caller provides none
pub const SUBJECT_EMPTY: &str = "SUBJECT_EMPTY";

/// Where a publish request is addressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishTarget {
    /// Topic ARN
    Topic(String),
    /// E.164 phone number for direct SMS
    Phone(String),
}

/// Marker telling SNS how to read the message body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStructure {
    /// Body is a JSON object keyed by protocol
    Json,
}

impl MessageStructure {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStructure::Json => "json",
        }
    }
}

/// Fully built outbound request handed to a `Publisher`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub target: PublishTarget,
    pub message: String,
    pub subject: String,
    pub message_group_id: Option<String>,
    pub message_structure: Option<MessageStructure>,
}

impl PublishRequest {
    pub fn topic_arn(&self) -> Option<&str> {
        match &self.target {
            PublishTarget::Topic(arn) => Some(arn),
            PublishTarget::Phone(_) => None,
        }
    }

    pub fn phone_number(&self) -> Option<&str> {
        match &self.target {
            PublishTarget::Phone(number) => Some(number),
            PublishTarget::Topic(_) => None,
        }
    }
}

/// Validated publish, one variant per strategy.
///
/// Every variant carries the fields its strategy requires, so building the
/// request cannot hit a missing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Fifo {
        topic_arn: String,
        message: String,
        message_group_id: Uuid,
        subject: String,
    },
    Standard {
        topic_arn: String,
        payload: MultiProtocolPayload,
        subject: String,
    },
    Sms {
        phone_number: String,
        message: String,
        subject: String,
    },
}

impl Dispatch {
    /// Validate `params` for the strategy behind `delivery_type`
    pub fn from_parameters(
        params: &PublishParameters,
        delivery_type: DeliveryType,
    ) -> Result<Self, ValidationError> {
        let strategy = delivery_type.strategy();
        let subject = subject_or_placeholder(params.subject.as_deref());

        match strategy {
            Strategy::Fifo => {
                let topic_arn = required(params.topic_arn.as_deref())
                    .ok_or(ValidationError::MissingTopicArn { strategy })?;
                // A nil UUID is the unset value; it cannot identify a group.
                let message_group_id = params
                    .message_group_id
                    .filter(|id| !id.is_nil())
                    .ok_or(ValidationError::MissingMessageGroupId)?;

                Ok(Dispatch::Fifo {
                    topic_arn: topic_arn.to_string(),
                    message: params.default_message.clone(),
                    message_group_id,
                    subject,
                })
            }
            Strategy::Standard => {
                let payload = params
                    .payload
                    .as_ref()
                    .ok_or(ValidationError::MissingPayload)?;
                let topic_arn = required(params.topic_arn.as_deref())
                    .ok_or(ValidationError::MissingTopicArn { strategy })?;
                if payload.default.is_empty() {
                    return Err(ValidationError::EmptyDefaultMessage);
                }

                Ok(Dispatch::Standard {
                    topic_arn: topic_arn.to_string(),
                    payload: payload.clone(),
                    subject,
                })
            }
            Strategy::Sms => {
                let phone_number = required(params.phone_number.as_deref())
                    .ok_or(ValidationError::MissingPhoneNumber)?;

                Ok(Dispatch::Sms {
                    phone_number: phone_number.to_string(),
                    message: params.default_message.clone(),
                    subject,
                })
            }
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Dispatch::Fifo { .. } => Strategy::Fifo,
            Dispatch::Standard { .. } => Strategy::Standard,
            Dispatch::Sms { .. } => Strategy::Sms,
        }
    }

    /// Build the outbound request
    pub fn into_request(self) -> Result<PublishRequest, PublisherError> {
        let request = match self {
            Dispatch::Fifo {
                topic_arn,
                message,
                message_group_id,
                subject,
            } => PublishRequest {
                target: PublishTarget::Topic(topic_arn),
                message,
                subject,
                message_group_id: Some(message_group_id.hyphenated().to_string()),
                message_structure: None,
            },
            Dispatch::Standard {
                topic_arn,
                payload,
                subject,
            } => PublishRequest {
                target: PublishTarget::Topic(topic_arn),
                // The whole envelope goes out regardless of which protocol
                // tag selected this strategy.
                message: payload.to_envelope()?,
                subject,
                message_group_id: None,
                message_structure: Some(MessageStructure::Json),
            },
            Dispatch::Sms {
                phone_number,
                message,
                subject,
            } => PublishRequest {
                target: PublishTarget::Phone(phone_number),
                message,
                subject,
                message_group_id: None,
                message_structure: None,
            },
        };
        Ok(request)
    }
}

fn required(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn subject_or_placeholder(subject: Option<&str>) -> String {
    match subject {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => SUBJECT_EMPTY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOPIC: &str = "arn:aws:sns:us-east-1:123456789012:orders.fifo";

    #[test]
    fn test_fifo_request_shape() {
        let group = Uuid::new_v4();
        let params = PublishParameters::new("{\"id\":1}")
            .with_topic_arn(TOPIC)
            .with_message_group_id(group);

        let request = Dispatch::from_parameters(&params, DeliveryType::FifoQueue)
            .unwrap()
            .into_request()
            .unwrap();

        assert_eq!(request.topic_arn(), Some(TOPIC));
        assert_eq!(request.message, "{\"id\":1}");
        assert_eq!(request.subject, SUBJECT_EMPTY);
        assert_eq!(request.message_group_id, Some(group.to_string()));
        assert_eq!(request.message_structure, None);
    }

    #[test]
    fn test_fifo_rejects_nil_group_id() {
        let params = PublishParameters::new("m")
            .with_topic_arn(TOPIC)
            .with_message_group_id(Uuid::nil());

        assert_eq!(
            Dispatch::from_parameters(&params, DeliveryType::FifoQueue),
            Err(ValidationError::MissingMessageGroupId)
        );
    }

    #[test]
    fn test_fifo_rejects_missing_topic() {
        let params = PublishParameters::new("m").with_message_group_id(Uuid::new_v4());

        assert_eq!(
            Dispatch::from_parameters(&params, DeliveryType::FifoQueue),
            Err(ValidationError::MissingTopicArn {
                strategy: Strategy::Fifo
            })
        );
    }

    #[test]
    fn test_standard_request_carries_whole_envelope() {
        let payload = MultiProtocolPayload::new("fallback")
            .email("email body")
            .http("http body");
        let params = PublishParameters::new("ignored")
            .with_topic_arn(TOPIC)
            .with_subject("Order update")
            .with_payload(payload.clone());

        let request = Dispatch::from_parameters(&params, DeliveryType::Email)
            .unwrap()
            .into_request()
            .unwrap();

        assert_eq!(request.message_structure, Some(MessageStructure::Json));
        assert_eq!(request.subject, "Order update");
        let sent: MultiProtocolPayload = serde_json::from_str(&request.message).unwrap();
        assert_eq!(sent, payload);
    }

    #[test]
    fn test_standard_rejects_empty_default() {
        let params = PublishParameters::new("m")
            .with_topic_arn(TOPIC)
            .with_payload(MultiProtocolPayload::default().http("x"));

        assert_eq!(
            Dispatch::from_parameters(&params, DeliveryType::Http),
            Err(ValidationError::EmptyDefaultMessage)
        );
    }

    #[test]
    fn test_sms_request_has_no_topic() {
        let params = PublishParameters::new("hello").with_phone_number("+15551234567");

        let request = Dispatch::from_parameters(&params, DeliveryType::Sms)
            .unwrap()
            .into_request()
            .unwrap();

        assert_eq!(request.phone_number(), Some("+15551234567"));
        assert_eq!(request.topic_arn(), None);
        assert_eq!(request.message, "hello");
        assert_eq!(request.subject, SUBJECT_EMPTY);
    }

    #[test]
    fn test_empty_subject_uses_placeholder() {
        let params = PublishParameters::new("hello")
            .with_phone_number("+15551234567")
            .with_subject("");

        let dispatch = Dispatch::from_parameters(&params, DeliveryType::Sms).unwrap();
        assert!(matches!(dispatch, Dispatch::Sms { ref subject, .. } if subject == SUBJECT_EMPTY));
    }
}
