use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub aws: AwsConfig,
    #[serde(default)]
    pub publish: SamplePublishConfig,
    #[serde(default)]
    pub otel: OtelConfig,
}

/// What the `sns-publish` binary sends
#[derive(Debug, Clone, Deserialize)]
pub struct SamplePublishConfig {
    /// Delivery type tag, e.g. `fifo-queue`, `email`, `sms`
    #[serde(default = "default_delivery_type")]
    pub delivery_type: String,
    pub subject: Option<String>,
    /// Required for `sms`
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AwsConfig {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_account_id")]
    pub account_id: String,
    /// Topic name; FIFO topics end in `.fifo`
    #[serde(default = "default_topic_name")]
    pub topic_name: String,
    /// Endpoint override, e.g. LocalStack
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    /// OTLP gRPC endpoint
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Trace sampling ratio (0.0-1.0)
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_account_id() -> String {
    "123456789012".to_string()
}

fn default_topic_name() -> String {
    "topic-test.fifo".to_string()
}

fn default_delivery_type() -> String {
    "fifo-queue".to_string()
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "sns-notification-adapter".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("aws.region", default_region())?
            .set_default("aws.account_id", default_account_id())?
            .set_default("aws.topic_name", default_topic_name())?
            .set_default("publish.delivery_type", default_delivery_type())?
            .set_default("otel.enabled", false)?
            .set_default("otel.endpoint", default_otel_endpoint())?
            .set_default("otel.service_name", default_service_name())?
            .set_default("otel.sampling_ratio", default_sampling_ratio())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // AWS__REGION, AWS__TOPIC_NAME, OTEL__ENABLED, ...
            // Values stay strings so account ids and phone numbers keep
            // leading zeros and `+`.
            .add_source(Environment::default().separator("__"));

        builder.build()?.try_deserialize()
    }

    pub fn topic_arn(&self) -> String {
        self.aws.topic_arn()
    }
}

impl AwsConfig {
    /// `arn:aws:sns:{region}:{account}:{topic}`
    pub fn topic_arn(&self) -> String {
        format!(
            "arn:aws:sns:{}:{}:{}",
            self.region, self.account_id, self.topic_name
        )
    }
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            account_id: default_account_id(),
            topic_name: default_topic_name(),
            endpoint_url: None,
        }
    }
}

impl Default for SamplePublishConfig {
    fn default() -> Self {
        Self {
            delivery_type: default_delivery_type(),
            subject: None,
            phone_number: None,
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}
