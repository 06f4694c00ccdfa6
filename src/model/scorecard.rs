use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized scorecard, built from a single detail page.
///
/// Optional scalars are `None` when the page did not carry them; the
/// sequences are always present and simply empty when the scorecard
/// table (or one of its rows) is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScorecardRecord {
    pub entry_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_id: Option<String>,
    #[serde(default)]
    pub holes: Vec<String>,
    #[serde(default)]
    pub distances: Vec<String>,
    #[serde(default)]
    pub pars: Vec<String>,
    #[serde(default)]
    pub players: Vec<PlayerScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_vs_par: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gsp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_embed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_user_id: Option<String>,
}

/// A `PLAYER <n>` row of the scorecard table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScores {
    /// The `<n>` label, kept as text.
    pub player: String,
    /// Every cell after the row label.
    pub scores: Vec<String>,
}

impl ScorecardRecord {
    pub fn new(entry_url: impl Into<String>) -> Self {
        Self {
            entry_url: entry_url.into(),
            ..Default::default()
        }
    }

    /// Score row of the first player on the card, if any.
    pub fn primary_scores(&self) -> Option<&[String]> {
        self.players.first().map(|p| p.scores.as_slice())
    }

    /// Attach provenance: the identifier the record was found under and
    /// the time it was collected.
    pub fn stamped(mut self, query_user_id: &str, scraped_at: DateTime<Utc>) -> Self {
        self.query_user_id = Some(query_user_id.to_string());
        self.scraped_at = Some(scraped_at);
        self
    }
}
