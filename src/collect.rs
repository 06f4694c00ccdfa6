use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::classifier::is_tracked;
use crate::config::Pacing;
use crate::model::{EntryLink, ScorecardRecord};
use crate::scraper::leaderboard::get_entry_links;
use crate::scraper::scorecard::get_scorecard;
use crate::scraper::PageSource;

/// Walks users one by one, fetching their leaderboard and every linked
/// scorecard, and keeps the records of tracked games.
///
/// Failures are contained: a user whose leaderboard cannot be fetched
/// contributes nothing, a scorecard that cannot be fetched is skipped.
pub struct Collector<'a, S> {
    source: &'a S,
    base_url: &'a str,
    pacing: Pacing,
}

impl<'a, S: PageSource> Collector<'a, S> {
    pub fn new(source: &'a S, base_url: &'a str, pacing: Pacing) -> Self {
        Self {
            source,
            base_url,
            pacing,
        }
    }

    /// Collect records for every user, in input order.
    pub async fn collect_all(&self, user_ids: &[String]) -> Vec<ScorecardRecord> {
        let mut records = Vec::new();
        for (idx, user_id) in user_ids.iter().enumerate() {
            if idx > 0 {
                tokio::time::sleep(self.pacing.between_users).await;
            }
            info!(
                user = idx + 1,
                total = user_ids.len(),
                user_id = %user_id,
                "scraping user"
            );
            records.extend(self.collect_user(user_id).await);
        }
        records
    }

    /// Collect the tracked records of a single user.
    #[instrument(skip(self))]
    pub async fn collect_user(&self, user_id: &str) -> Vec<ScorecardRecord> {
        let links = match get_entry_links(self.source, self.base_url, user_id).await {
            Ok(links) => links,
            Err(e) => {
                warn!(user_id, error = %e, "skipping user, leaderboard unavailable");
                return Vec::new();
            }
        };
        if links.is_empty() {
            info!(user_id, "no entries on leaderboard");
            return Vec::new();
        }
        info!(count = links.len(), "found entries");

        let mut records = Vec::new();
        for (idx, link) in links.iter().enumerate() {
            if idx > 0 {
                tokio::time::sleep(self.pacing.between_entries).await;
            }
            let Some(record) = self.collect_entry(user_id, link).await else {
                continue;
            };
            info!(
                entry = idx + 1,
                total = links.len(),
                game = record.game.as_deref().unwrap_or_default(),
                course = record.course.as_deref().unwrap_or_default(),
                total_score = record.total_score.as_deref().unwrap_or_default(),
                video = record.youtube_video.is_some(),
                "collected scorecard"
            );
            records.push(record);
        }
        records
    }

    async fn collect_entry(&self, user_id: &str, link: &EntryLink) -> Option<ScorecardRecord> {
        let mut record = match get_scorecard(self.source, &link.url).await {
            Ok(record) => record,
            Err(e) => {
                warn!(url = %link.url, error = %e, "skipping entry");
                return None;
            }
        };

        // The page title wins; the leaderboard hint only fills a gap.
        if record.game.is_none() && !link.game_hint.is_empty() {
            record.game = Some(link.game_hint.clone());
        }
        if !is_tracked(record.game.as_deref()) {
            debug!(url = %link.url, game = ?record.game, "untracked game");
            return None;
        }
        Some(record.stamped(user_id, Utc::now()))
    }
}

/// Number of records per game, in order of first appearance.
pub fn summarize(records: &[ScorecardRecord]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in records {
        let game = record.game.as_deref().unwrap_or("Unknown");
        match counts.iter_mut().find(|(g, _)| g == game) {
            Some((_, count)) => *count += 1,
            None => counts.push((game.to_string(), 1)),
        }
    }
    counts
}
