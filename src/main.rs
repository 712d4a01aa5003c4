use std::sync::Arc;

use anyhow::Result;
use rand::Rng;
use uuid::Uuid;

use sns_notification_adapter::config::Settings;
use sns_notification_adapter::metrics::encode_metrics;
use sns_notification_adapter::telemetry::init_telemetry;
use sns_notification_adapter::{Dispatcher, MultiProtocolPayload, PublishParameters, SnsPublisher};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    let _telemetry = init_telemetry(&settings.otel)?;
    tracing::info!("Configuration loaded");

    let publisher = SnsPublisher::from_settings(&settings.aws).await;
    let dispatcher = Dispatcher::new(Arc::new(publisher));

    let body = sample_content()?;
    let topic_arn = settings.topic_arn();

    // Carry every strategy's fields; the dispatcher only reads what the
    // configured delivery type needs.
    let mut parameters = PublishParameters::new(body.clone())
        .with_payload(MultiProtocolPayload::uniform(body))
        .with_topic_arn(&topic_arn)
        .with_message_group_id(Uuid::new_v4());
    parameters.subject = settings.publish.subject.clone();
    parameters.phone_number = settings.publish.phone_number.clone();

    let delivery_type = settings.publish.delivery_type.as_str();
    let published = dispatcher
        .publish_tagged(Some(&parameters), delivery_type)
        .await?;

    tracing::info!(
        topic_arn = %topic_arn,
        delivery_type = %delivery_type,
        published,
        "Sample publish finished"
    );
    if let Ok(metrics) = encode_metrics() {
        tracing::debug!(metrics = %metrics, "Publish metrics");
    }

    anyhow::ensure!(published, "Sample {} publish was not accepted", delivery_type);
    Ok(())
}

fn sample_content() -> Result<String> {
    let content = serde_json::json!({
        "UserId": Uuid::new_v4(),
        "UserName": format!("User-{}", Uuid::new_v4()),
        "Age": rand::rng().random_range(18..100),
    });
    Ok(serde_json::to_string(&content)?)
}
