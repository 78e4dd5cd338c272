use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sns::Client as SnsClient;
use aws_sdk_sns::config::Region;
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::types::MessageAttributeValue;
use tracing::info;

const SMS_SENDER_ID_ATTRIBUTE: &str = "AWS.SNS.SMS.SenderID";
const SMS_SENDER_ID: &str = "FOOTBALL";

/// A publish failure is not recovered: it aborts the rest of the batch and fails the
/// invocation.
#[derive(Debug, thiserror::Error)]
pub enum PublishFailure {
    #[error("failed to build message attributes: {0}")]
    Attributes(#[from] aws_sdk_sns::error::BuildError),
    #[error("sns publish failed: {0}")]
    Request(String),
}

/// Destination for finished alerts. The lambda wires in `SnsPublisher`; tests
/// substitute recording stubs.
#[async_trait]
pub trait Publisher {
    /// Deliver one alert; returns the delivery's message id.
    async fn publish(&self, message: &str, subject: &str) -> Result<String, PublishFailure>;
}

/// SNS topic client scoped to a single invocation (construct, use, discard).
#[derive(Debug, Clone)]
pub struct SnsPublisher {
    client: SnsClient,
    topic_arn: String,
}

impl SnsPublisher {
    pub async fn new(region: &str, topic_arn: String) -> Self {
        let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let config = aws_sdk_sns::config::Builder::from(&shared)
            .region(Region::new(region.to_owned()))
            .build();
        Self {
            client: SnsClient::from_conf(config),
            topic_arn,
        }
    }
}

#[async_trait]
impl Publisher for SnsPublisher {
    async fn publish(&self, message: &str, subject: &str) -> Result<String, PublishFailure> {
        let sender_id = MessageAttributeValue::builder()
            .data_type("String")
            .string_value(SMS_SENDER_ID)
            .build()?;
        let output = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .message(message)
            .subject(subject)
            .message_attributes(SMS_SENDER_ID_ATTRIBUTE, sender_id)
            .send()
            .await
            .map_err(|e| PublishFailure::Request(format!("{}", DisplayErrorContext(&e))))?;

        let message_id = output.message_id().unwrap_or("unknown").to_string();
        info!(message_id = %message_id, "Published alert to SNS topic");
        Ok(message_id)
    }
}
