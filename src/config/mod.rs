mod settings;

pub use settings::{AwsConfig, OtelConfig, SamplePublishConfig, Settings};
