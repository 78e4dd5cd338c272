use std::collections::HashSet;

use chrono::DateTime;
use chrono_tz::Tz;
use tracing::warn;

use crate::model::fixture::{FixtureRecord, TeamSide};

pub const ALERT_SUBJECT: &str = "Football Traffic Alert";

const UNKNOWN_HOME_TEAM: &str = "Unknown Home Team";
const UNKNOWN_AWAY_TEAM: &str = "Unknown Away Team";
const UNKNOWN_VENUE: &str = "Unknown Venue";
const TIME_TBD: &str = "Time TBD";

/// Teams whose fixtures trigger an alert, keyed by provider team id. Matching is by
/// numeric id, home or away; an empty set matches nothing (config enforces non-empty).
#[derive(Debug, Clone)]
pub struct TargetTeams {
    ids: HashSet<i64>,
}

impl TargetTeams {
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, team_id: i64) -> bool {
        self.ids.contains(&team_id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Filter fixtures down to those involving a target team and render one alert per
/// match. Input order is preserved. Records missing an id needed for matching are
/// skipped with a diagnostic; every other absent field degrades to placeholder text.
pub fn build_alerts(fixtures: &[FixtureRecord], targets: &TargetTeams, tz: Tz) -> Vec<String> {
    let mut alerts = Vec::new();

    for record in fixtures {
        let fixture_id = record.fixture.as_ref().and_then(|f| f.id);

        let teams = match record.teams.as_ref() {
            Some(teams) => teams,
            None => {
                warn!(fixture_id, "Fixture record has no teams block, skipping");
                continue;
            }
        };
        let (Some(home_id), Some(away_id)) = (
            teams.home.as_ref().and_then(|t| t.id),
            teams.away.as_ref().and_then(|t| t.id),
        ) else {
            warn!(fixture_id, "Fixture record is missing a team id, skipping");
            continue;
        };

        // The target team may be playing at home or away.
        if !targets.contains(home_id) && !targets.contains(away_id) {
            continue;
        }

        let home_name = team_name(teams.home.as_ref()).unwrap_or(UNKNOWN_HOME_TEAM);
        let away_name = team_name(teams.away.as_ref()).unwrap_or(UNKNOWN_AWAY_TEAM);
        let venue_name = record
            .fixture
            .as_ref()
            .and_then(|f| f.venue.as_ref())
            .and_then(|v| v.name.as_deref())
            .unwrap_or(UNKNOWN_VENUE);
        let kickoff = kickoff_time(record.fixture.as_ref().and_then(|f| f.date.as_deref()), tz);

        alerts.push(format!(
            "MATCH DAY ALERT: {} vs {} at {}. Kickoff: {} ({}). Expect local traffic.",
            home_name,
            away_name,
            venue_name,
            kickoff,
            tz.name()
        ));
    }

    alerts
}

fn team_name(side: Option<&TeamSide>) -> Option<&str> {
    side.and_then(|t| t.name.as_deref())
}

/// Render a kickoff timestamp as a 12-hour clock time in `tz`. A missing or
/// unparsable timestamp becomes "Time TBD" rather than failing the alert.
fn kickoff_time(raw: Option<&str>, tz: Tz) -> String {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&tz).format("%I:%M %p").to_string())
        .unwrap_or_else(|| TIME_TBD.to_string())
}
