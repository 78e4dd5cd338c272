use chrono_tz::Tz;
use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::alerts::{ALERT_SUBJECT, TargetTeams, build_alerts};
use crate::api_football::{ApiFootball, FixtureQuery, FixtureSource};
use crate::config::{ConfigError, JobConfig};
use crate::sns::{PublishFailure, Publisher, SnsPublisher};

pub const NO_MATCHES_BODY: &str = "No relevant home matches scheduled today.";
pub const CONFIG_ERROR_BODY: &str = "Configuration error.";

/// Structured invocation result returned to the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

/// Lambda entry point. The trigger payload carries no inputs; everything comes from
/// the environment, checked once before any network call.
#[instrument(skip(event))]
pub async fn handler(event: LambdaEvent<Value>) -> Result<Response, Error> {
    let _ = event;

    let config = match JobConfig::from_env() {
        Ok(config) => config,
        Err(e) => return Ok(config_error_response(&e)),
    };

    let source = ApiFootball::new(config.api_key.clone());
    let publisher = SnsPublisher::new(&config.region, config.topic_arn.clone()).await;

    let response = run_job(&source, &publisher, &config.targets, config.timezone).await?;
    Ok(response)
}

/// The invocation result when required configuration is absent or invalid. The check
/// runs before any collaborator is constructed, so nothing downstream is reached.
pub fn config_error_response(error: &ConfigError) -> Response {
    error!(error = %error, "Invocation aborted on missing or invalid configuration");
    Response {
        status_code: 500,
        body: CONFIG_ERROR_BODY.to_string(),
    }
}

/// Fetch today's fixtures, build an alert per target-team match, and publish each one
/// in order. Publishing aborts on the first failure; alerts already published in the
/// batch stay published.
pub async fn run_job<S, P>(
    source: &S,
    publisher: &P,
    targets: &TargetTeams,
    timezone: Tz,
) -> Result<Response, PublishFailure>
where
    S: FixtureSource + Sync,
    P: Publisher + Sync,
{
    let query = FixtureQuery::today(timezone);
    let fixtures = source.fetch(&query).await;
    let alerts = build_alerts(&fixtures, targets, timezone);

    if alerts.is_empty() {
        info!("No fixtures matched the target teams");
        return Ok(Response {
            status_code: 200,
            body: NO_MATCHES_BODY.to_string(),
        });
    }

    let mut message_ids = Vec::with_capacity(alerts.len());
    for alert in &alerts {
        let message_id = publisher.publish(alert, ALERT_SUBJECT).await?;
        info!(message_id = %message_id, "Alert published");
        message_ids.push(message_id);
    }

    Ok(Response {
        status_code: 200,
        body: format!(
            "Published {} alert(s). Message IDs: {}",
            message_ids.len(),
            message_ids.join(", ")
        ),
    })
}
