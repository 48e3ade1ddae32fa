use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque identifier of a single played match, e.g. `EUW1_6842123456`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MatchId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MatchId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Full match payload as returned by the match endpoint.
///
/// Only the fields the application reads are typed; everything else is kept
/// in `extra` so a cached record serializes back to the same document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchMetadata {
    #[serde(rename = "matchId")]
    pub match_id: MatchId,
    #[serde(rename = "dataVersion", default)]
    pub data_version: String,
    /// PUUIDs of every participant, in participant order
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchInfo {
    /// Milliseconds since the Unix epoch
    #[serde(rename = "gameCreation", default)]
    pub game_creation: i64,
    /// Seconds
    #[serde(rename = "gameDuration", default)]
    pub game_duration: i64,
    #[serde(rename = "gameMode", default)]
    pub game_mode: String,
    #[serde(rename = "gameVersion", default)]
    pub game_version: String,
    #[serde(rename = "queueId", default)]
    pub queue_id: i32,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub puuid: String,
    #[serde(rename = "championName", default)]
    pub champion_name: String,
    #[serde(rename = "teamId", default)]
    pub team_id: i32,
    #[serde(default)]
    pub kills: i32,
    #[serde(default)]
    pub deaths: i32,
    #[serde(default)]
    pub assists: i32,
    #[serde(default)]
    pub win: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MatchRecord {
    pub fn id(&self) -> &MatchId {
        &self.metadata.match_id
    }

    /// Finds the participant entry belonging to the given account
    pub fn participant(&self, puuid: &str) -> Option<&Participant> {
        self.info.participants.iter().find(|p| p.puuid == puuid)
    }

    /// Local start time of the match, if the creation timestamp is usable
    pub fn started_at(&self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.info.game_creation).single()
    }

    /// Condensed, display-ready view of this match from one player's perspective
    pub fn summary(&self, puuid: Option<&str>) -> MatchSummary {
        let participant = puuid.and_then(|p| self.participant(p));
        MatchSummary {
            match_id: self.id().clone(),
            started_at: self
                .started_at()
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            duration: format!(
                "{}:{:02}",
                self.info.game_duration / 60,
                self.info.game_duration % 60
            ),
            game_mode: self.info.game_mode.clone(),
            champion: participant.map(|p| p.champion_name.clone()),
            kda: participant.map(|p| format!("{}/{}/{}", p.kills, p.deaths, p.assists)),
            win: participant.map(|p| p.win),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub match_id: MatchId,
    pub started_at: String,
    pub duration: String,
    pub game_mode: String,
    pub champion: Option<String>,
    pub kda: Option<String>,
    pub win: Option<bool>,
}

impl fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<20} {:<16} {:>6}  {:<10}",
            self.match_id, self.started_at, self.duration, self.game_mode
        )?;
        if let (Some(champion), Some(kda), Some(win)) = (&self.champion, &self.kda, self.win) {
            let outcome = if win { "WIN" } else { "LOSS" };
            write!(f, "  {champion:<14} {kda:<9} {outcome}")?;
        }
        Ok(())
    }
}
