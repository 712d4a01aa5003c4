// Infrastructure
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

// Domain
pub mod notification;
pub mod publisher;

pub use notification::{
    DeliveryType, Dispatcher, MultiProtocolPayload, PublishParameters, PublishRequest,
};
pub use publisher::{Publisher, SnsPublisher};
