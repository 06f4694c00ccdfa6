use ::scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::model::EntryLink;
use crate::scraper::{element_text, resolve_url, PageSource};

/// Path token shared by all scorecard detail links (matched case-insensitively).
const ENTRY_PATH_TOKEN: &str = "entryspecific";

/// Fragments of the tracked family's titles, used to spot the game name in
/// the row around a link.
const TITLE_KEYWORDS: &[&str] = &["golden tee", "power putt"];

/// Leaderboard page listing every entry submitted by `user_id`.
pub fn leaderboard_url(base_url: &str, user_id: &str) -> String {
    format!(
        "{}/en/Highscore/UserSpecific?queryId={user_id}",
        base_url.trim_end_matches('/')
    )
}

/// Fetch the leaderboard page of `user_id` and return its detail links.
#[instrument(skip(source))]
pub(crate) async fn get_entry_links<S: PageSource>(
    source: &S,
    base_url: &str,
    user_id: &str,
) -> Result<Vec<EntryLink>> {
    let url = leaderboard_url(base_url, user_id);
    let body = source.fetch(&url).await?;
    let links = extract_entry_links(&body, base_url)?;
    debug!(count = links.len(), user_id, "parsed leaderboard page");
    Ok(links)
}

/// Every scorecard link on a leaderboard page, in document order.
pub fn extract_entry_links(html: &str, base_url: &str) -> Result<Vec<EntryLink>> {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a[href]")?;

    let links = document
        .select(&link_selector)
        .filter_map(|link| {
            let href = link.value().attr("href")?;
            if !href.to_ascii_lowercase().contains(ENTRY_PATH_TOKEN) {
                return None;
            }
            Some(EntryLink {
                url: resolve_url(base_url, href),
                game_hint: game_hint(&link),
            })
        })
        .collect();
    Ok(links)
}

/// The link text, unless the enclosing row or block names a tracked game,
/// in which case that text wins.
fn game_hint(link: &ElementRef) -> String {
    let row = link
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| matches!(e.value().name(), "tr" | "div"));

    row.and_then(|row| {
        row.text().find(|t| {
            let t = t.to_lowercase();
            TITLE_KEYWORDS.iter().any(|k| t.contains(k))
        })
    })
    .map(|t| t.trim().to_string())
    .unwrap_or_else(|| element_text(link))
}
