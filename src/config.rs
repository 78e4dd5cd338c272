use std::env;

use chrono_tz::Tz;

use crate::alerts::TargetTeams;

const DEFAULT_REGION: &str = "eu-west-2";
const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::London;
const DEFAULT_TARGET_TEAM_IDS: [i64; 2] = [33, 36];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),
    #[error("TIMEZONE is not a valid IANA timezone name: {0}")]
    InvalidTimezone(String),
    #[error("TARGET_TEAM_IDS must be a non-empty comma-separated list of numeric team ids: {0:?}")]
    InvalidTargets(String),
}

/// Everything the job needs, resolved once per invocation before any network call.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub api_key: String,
    pub topic_arn: String,
    pub region: String,
    pub timezone: Tz,
    pub targets: TargetTeams,
}

impl JobConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // The provider credential historically shipped as lowercase `api_key`.
        let api_key = env::var("API_KEY")
            .or_else(|_| env::var("api_key"))
            .map_err(|_| ConfigError::MissingVar("API_KEY"))?;
        let topic_arn = env::var("TOPIC_ARN").map_err(|_| ConfigError::MissingVar("TOPIC_ARN"))?;
        let region = env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string());

        let timezone = match env::var("TIMEZONE") {
            Ok(name) => name
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimezone(name))?,
            Err(_) => DEFAULT_TIMEZONE,
        };

        let targets = match env::var("TARGET_TEAM_IDS") {
            Ok(raw) => parse_target_ids(&raw)?,
            Err(_) => TargetTeams::new(DEFAULT_TARGET_TEAM_IDS),
        };

        Ok(Self {
            api_key,
            topic_arn,
            region,
            timezone,
            targets,
        })
    }
}

fn parse_target_ids(raw: &str) -> Result<TargetTeams, ConfigError> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<i64>)
        .collect::<Result<Vec<i64>, _>>()
        .map_err(|_| ConfigError::InvalidTargets(raw.to_string()))?;
    if ids.is_empty() {
        return Err(ConfigError::InvalidTargets(raw.to_string()));
    }
    Ok(TargetTeams::new(ids))
}
