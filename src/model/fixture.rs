use serde::{Deserialize, Serialize};

/// One provider fixture record. The payload is untrusted, so every nested field is
/// optional and absence is resolved per field at formatting time.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FixtureRecord {
    #[serde(default)]
    pub fixture: Option<FixtureDetails>,
    #[serde(default)]
    pub teams: Option<FixtureTeams>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FixtureDetails {
    #[serde(default)]
    pub id: Option<i64>,
    /// Kickoff timestamp, ISO 8601 with offset (a trailing `Z` means UTC).
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub venue: Option<Venue>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Venue {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FixtureTeams {
    #[serde(default)]
    pub home: Option<TeamSide>,
    #[serde(default)]
    pub away: Option<TeamSide>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TeamSide {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}
