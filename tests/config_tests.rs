use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use lambda_runtime::{Context, LambdaEvent};

use football_alert_lambda_rust::api_football::{FixtureQuery, FixtureSource};
use football_alert_lambda_rust::config::{ConfigError, JobConfig};
use football_alert_lambda_rust::handler::{
    CONFIG_ERROR_BODY, config_error_response, handler, run_job,
};
use football_alert_lambda_rust::model::fixture::FixtureRecord;
use football_alert_lambda_rust::sns::{PublishFailure, Publisher};

struct CountingSource {
    calls: AtomicUsize,
}

#[async_trait]
impl FixtureSource for CountingSource {
    async fn fetch(&self, _query: &FixtureQuery) -> Vec<FixtureRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Vec::new()
    }
}

struct NoopPublisher;

#[async_trait]
impl Publisher for NoopPublisher {
    async fn publish(&self, _message: &str, _subject: &str) -> Result<String, PublishFailure> {
        Ok("unused".to_string())
    }
}

// Environment mutation is process-wide, so every scenario runs inside this single
// test to keep the binary free of races. In edition 2024 set_var/remove_var are
// unsafe for the same reason.
#[tokio::test]
async fn from_env_scenarios() {
    fn clear() {
        for var in [
            "API_KEY",
            "api_key",
            "TOPIC_ARN",
            "AWS_REGION",
            "TIMEZONE",
            "TARGET_TEAM_IDS",
        ] {
            unsafe { std::env::remove_var(var) };
        }
    }

    // Missing credential aborts before anything else is read.
    clear();
    assert!(matches!(
        JobConfig::from_env(),
        Err(ConfigError::MissingVar("API_KEY"))
    ));

    // The config gate decides between the job and the 500 before the fixture source
    // is consulted: with the credential absent, the counting source sees zero calls.
    let source = CountingSource {
        calls: AtomicUsize::new(0),
    };
    let publisher = NoopPublisher;
    let response = match JobConfig::from_env() {
        Ok(config) => run_job(&source, &publisher, &config.targets, config.timezone)
            .await
            .expect("run_job failed"),
        Err(e) => config_error_response(&e),
    };
    assert_eq!(response.status_code, 500);
    assert_eq!(response.body, CONFIG_ERROR_BODY);
    assert_eq!(
        source.calls.load(Ordering::SeqCst),
        0,
        "no fetch may be attempted without configuration"
    );

    // The full handler short-circuits to the same 500 on this condition, before any
    // client is constructed or any request goes out.
    let event = LambdaEvent::new(serde_json::json!({"source": "aws.events"}), Context::default());
    let response = handler(event).await.expect("handler should not error here");
    assert_eq!(response.status_code, 500);
    assert_eq!(response.body, CONFIG_ERROR_BODY);

    // The lowercase credential spelling is accepted, but the topic is still required.
    clear();
    unsafe { std::env::set_var("api_key", "dummy-api-key") };
    assert!(matches!(
        JobConfig::from_env(),
        Err(ConfigError::MissingVar("TOPIC_ARN"))
    ));

    // Minimal valid environment picks up every default.
    clear();
    unsafe {
        std::env::set_var("API_KEY", "dummy-api-key");
        std::env::set_var("TOPIC_ARN", "arn:aws:sns:eu-west-2:123456789012:football-alerts");
    }
    let config = JobConfig::from_env().expect("minimal config should load");
    assert_eq!(config.region, "eu-west-2");
    assert_eq!(config.timezone.name(), "Europe/London");
    assert!(config.targets.contains(33));
    assert!(config.targets.contains(36));
    assert!(!config.targets.is_empty());

    // Overrides are honored.
    unsafe {
        std::env::set_var("AWS_REGION", "eu-west-1");
        std::env::set_var("TIMEZONE", "Europe/Paris");
        std::env::set_var("TARGET_TEAM_IDS", "40,50");
    }
    let config = JobConfig::from_env().expect("overridden config should load");
    assert_eq!(config.region, "eu-west-1");
    assert_eq!(config.timezone.name(), "Europe/Paris");
    assert!(config.targets.contains(40));
    assert!(!config.targets.contains(33));

    // Invalid overrides are configuration errors, not silent defaults.
    unsafe { std::env::set_var("TIMEZONE", "Mars/OlympusMons") };
    assert!(matches!(
        JobConfig::from_env(),
        Err(ConfigError::InvalidTimezone(_))
    ));

    unsafe {
        std::env::set_var("TIMEZONE", "Europe/London");
        std::env::set_var("TARGET_TEAM_IDS", "");
    }
    assert!(matches!(
        JobConfig::from_env(),
        Err(ConfigError::InvalidTargets(_))
    ));

    clear();
}
