use serde::Serialize;

/// A detail-page link found on a user's leaderboard page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryLink {
    /// Absolute URL of the scorecard page.
    pub url: String,
    /// Best-effort game name taken from the leaderboard markup. Only used
    /// when the scorecard page itself carries no title.
    pub game_hint: String,
}
