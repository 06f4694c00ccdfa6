use ::scraper::{ElementRef, Html, Selector};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::model::{PlayerScores, ScorecardRecord};
use crate::scraper::{element_text, select_text, PageSource};

const EMBED_MARKER: &str = "youtube.com/embed/";
const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Fetch a detail page and parse it into a record.
#[instrument(skip(source))]
pub(crate) async fn get_scorecard<S: PageSource>(source: &S, url: &str) -> Result<ScorecardRecord> {
    let body = source.fetch(url).await?;
    parse_scorecard(&body, url)
}

/// Parse a scorecard detail page. Every section is optional: whatever is
/// missing from the markup stays unset on the returned record. Without a
/// scorecard table only the title and username are read.
pub fn parse_scorecard(html: &str, entry_url: &str) -> Result<ScorecardRecord> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let mut record = ScorecardRecord::new(entry_url);

    let title_selector = Selector::parse("h1")?;
    record.game = select_text(&root, &title_selector).filter(|t| !t.is_empty());
    record.username = parse_username(&root)?;

    let table_selector = Selector::parse("table.scorecard-table")?;
    let Some(table) = root.select(&table_selector).next() else {
        debug!(entry_url, "no scorecard table");
        return Ok(record);
    };
    parse_table(&table, &mut record)?;
    derive_totals(&mut record);

    parse_video(&root, &mut record)?;
    Ok(record)
}

/// The player name is a `button.btn-info` inside the first profile link.
fn parse_username(root: &ElementRef) -> Result<Option<String>> {
    let profile_selector = Selector::parse(r#"a[href*="/ProfileViewer/Index/"]"#)?;
    let button_selector = Selector::parse("button.btn-info")?;
    Ok(root
        .select(&profile_selector)
        .next()
        .and_then(|link| select_text(&link, &button_selector)))
}

/// What a body row of the scorecard table holds, keyed by its first cell.
#[derive(Debug, PartialEq, Eq)]
enum RowTag {
    Distance,
    Par,
    Player(String),
    Course,
    Date,
    CaptureId,
    Other,
}

impl RowTag {
    fn classify(label: &str) -> Self {
        let label = label.to_uppercase();
        match label.as_str() {
            "DISTANCE" => RowTag::Distance,
            "PAR" => RowTag::Par,
            "COURSE:" => RowTag::Course,
            "DATE:" => RowTag::Date,
            "CAPTURE ID:" => RowTag::CaptureId,
            _ => {
                let mut words = label.split_whitespace();
                match (words.next(), words.next()) {
                    (Some("PLAYER"), Some(n)) => RowTag::Player(n.to_string()),
                    _ => RowTag::Other,
                }
            }
        }
    }
}

fn parse_table(table: &ElementRef, record: &mut ScorecardRecord) -> Result<()> {
    let head_row_selector = Selector::parse("thead tr")?;
    let th_selector = Selector::parse("th")?;
    let tbody_selector = Selector::parse("tbody")?;
    let tr_selector = Selector::parse("tr")?;
    let td_selector = Selector::parse("td")?;

    if let Some(header) = table.select(&head_row_selector).next() {
        record.holes = header
            .select(&th_selector)
            .map(|th| element_text(&th))
            .collect();
    }

    // Only the first body section; fall back to every row when there is none.
    let rows = match table.select(&tbody_selector).next() {
        Some(tbody) => tbody.select(&tr_selector).collect_vec(),
        None => table.select(&tr_selector).collect_vec(),
    };

    for row in rows {
        let cells = row
            .select(&td_selector)
            .map(|td| element_text(&td))
            .collect_vec();
        let Some((label, rest)) = cells.split_first() else {
            continue;
        };

        match RowTag::classify(label) {
            RowTag::Distance => record.distances = rest.to_vec(),
            RowTag::Par => record.pars = rest.to_vec(),
            RowTag::Player(player) => record.players.push(PlayerScores {
                player,
                scores: rest.to_vec(),
            }),
            RowTag::Course => record.course = rest.first().cloned(),
            RowTag::Date => record.date = rest.first().cloned(),
            RowTag::CaptureId => record.capture_id = rest.first().cloned(),
            RowTag::Other => debug!(label = %label, "ignoring scorecard row"),
        }
    }

    Ok(())
}

/// Summary columns sit at the end of player 1's row: total, score vs par,
/// then GSP. `total_score` needs more than three cells; the other two only
/// need their own cell to exist.
fn derive_totals(record: &mut ScorecardRecord) {
    let Some(scores) = record.primary_scores().filter(|s| !s.is_empty()) else {
        return;
    };
    let from_end = |offset: usize| {
        scores
            .len()
            .checked_sub(offset)
            .map(|i| scores[i].clone())
    };

    let total_score = if scores.len() > 3 { from_end(3) } else { None };
    let score_vs_par = from_end(2);
    let gsp = from_end(1);

    record.total_score = total_score;
    record.score_vs_par = score_vs_par;
    record.gsp = gsp;
}

/// Look for a `div.card` titled "Video" that embeds a frame.
fn parse_video(root: &ElementRef, record: &mut ScorecardRecord) -> Result<()> {
    let card_selector = Selector::parse("div.card")?;
    let header_selector = Selector::parse("h3.card-header")?;
    let iframe_selector = Selector::parse("iframe[src]")?;

    let src = root
        .select(&card_selector)
        .filter(|card| {
            card.select(&header_selector)
                .next()
                .is_some_and(|h| h.text().collect::<String>().contains("Video"))
        })
        .find_map(|card| {
            card.select(&iframe_selector)
                .next()
                .and_then(|iframe| iframe.value().attr("src"))
                .filter(|src| !src.is_empty())
        });

    let Some(src) = src else {
        return Ok(());
    };

    match src.split_once(EMBED_MARKER) {
        Some((_, rest)) => {
            let video_id = rest.split('?').next().unwrap_or_default();
            record.youtube_video = Some(format!("{WATCH_URL}{video_id}"));
            record.youtube_embed = Some(src.to_string());
        }
        None => record.youtube_video = Some(src.to_string()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://teknoparrot.com/en/Highscore/EntrySpecific?id=42";

    const FULL_PAGE: &str = r#"
        <html><body>
          <h1> Golden Tee Live 2006 </h1>
          <a href="/en/ProfileViewer/Index/77"><button class="btn btn-info"> Ace </button></a>
          <table class="table scorecard-table">
            <thead>
              <tr><th>Hole</th><th>1</th><th>2</th><th>3</th><th>Total</th><th>+/-</th><th>GSP</th></tr>
            </thead>
            <tbody>
              <tr><td>Distance</td><td>410</td><td>180</td><td>520</td></tr>
              <tr><td>Par</td><td>4</td><td>3</td><td>5</td></tr>
              <tr><td>Player 1</td><td>3</td><td>2</td><td>4</td><td>9</td><td>-3</td><td>88</td></tr>
              <tr><td>Player 2</td><td>4</td><td>3</td><td>5</td><td>12</td><td>E</td><td>75</td></tr>
              <tr><td>Course:</td><td>Lost Woods</td></tr>
              <tr><td>Date:</td><td>3/14/2024</td></tr>
              <tr><td>Capture ID:</td><td>XJ-991</td></tr>
              <tr><td>Weather</td><td>Sunny</td></tr>
            </tbody>
          </table>
          <div class="card">
            <h3 class="card-header">Video Replay</h3>
            <iframe src="https://www.youtube.com/embed/abc123?x=1"></iframe>
          </div>
        </body></html>
    "#;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn card_with_scores(scores: &[&str]) -> String {
        let cells: String = scores.iter().map(|s| format!("<td>{s}</td>")).collect();
        format!(
            r#"<table class="scorecard-table"><tbody><tr><td>PLAYER 1</td>{cells}</tr></tbody></table>"#
        )
    }

    #[test]
    fn test_parse_full_scorecard() {
        let record = parse_scorecard(FULL_PAGE, URL).unwrap();

        assert_eq!(record.entry_url, URL);
        assert_eq!(record.game.as_deref(), Some("Golden Tee Live 2006"));
        assert_eq!(record.username.as_deref(), Some("Ace"));
        assert_eq!(
            record.holes,
            strings(&["Hole", "1", "2", "3", "Total", "+/-", "GSP"])
        );
        assert_eq!(record.distances, strings(&["410", "180", "520"]));
        assert_eq!(record.pars, strings(&["4", "3", "5"]));
        assert_eq!(record.players.len(), 2);
        assert_eq!(record.players[0].player, "1");
        assert_eq!(record.players[1].player, "2");
        assert_eq!(record.course.as_deref(), Some("Lost Woods"));
        assert_eq!(record.date.as_deref(), Some("3/14/2024"));
        assert_eq!(record.capture_id.as_deref(), Some("XJ-991"));
        assert_eq!(record.total_score.as_deref(), Some("9"));
        assert_eq!(record.score_vs_par.as_deref(), Some("-3"));
        assert_eq!(record.gsp.as_deref(), Some("88"));
        assert_eq!(
            record.youtube_video.as_deref(),
            Some("https://www.youtube.com/watch?v=abc123")
        );
        assert_eq!(
            record.youtube_embed.as_deref(),
            Some("https://www.youtube.com/embed/abc123?x=1")
        );
    }

    #[test]
    fn test_missing_table_is_partial_record() {
        let html = r#"<h1>Golden Tee Live 2007</h1>
            <a href="/en/ProfileViewer/Index/1"><button class="btn-info">Bo</button></a>
            <table class="other"><tr><td>PAR</td><td>4</td></tr></table>
            <div class="card"><h3 class="card-header">Video</h3>
              <iframe src="https://www.youtube.com/embed/zzz"></iframe></div>"#;
        let record = parse_scorecard(html, URL).unwrap();

        assert_eq!(record.game.as_deref(), Some("Golden Tee Live 2007"));
        assert_eq!(record.username.as_deref(), Some("Bo"));
        assert!(record.holes.is_empty());
        assert!(record.distances.is_empty());
        assert!(record.pars.is_empty());
        assert!(record.players.is_empty());
        assert_eq!(record.course, None);
        assert_eq!(record.total_score, None);
        assert_eq!(record.score_vs_par, None);
        assert_eq!(record.gsp, None);
        assert_eq!(record.youtube_video, None);
    }

    #[test]
    fn test_empty_page() {
        let record = parse_scorecard("", URL).unwrap();
        assert_eq!(record, ScorecardRecord::new(URL));
    }

    #[test]
    fn test_username_requires_button_inside_profile_link() {
        let html = r#"<a href="/en/ProfileViewer/Index/1">Bo</a>
            <button class="btn-info">Elsewhere</button>"#;
        let record = parse_scorecard(html, URL).unwrap();
        assert_eq!(record.username, None);
    }

    #[test]
    fn test_player_rows_keep_order_among_other_rows() {
        let html = r#"<table class="scorecard-table"><tbody>
            <tr><td>PLAYER 2</td><td>70</td><td>71</td><td>-2</td><td>141</td></tr>
            <tr><td>PAR</td><td>72</td></tr>
            <tr><td>player 3</td><td>80</td></tr>
        </tbody></table>"#;
        let record = parse_scorecard(html, URL).unwrap();

        assert_eq!(
            record.players,
            vec![
                PlayerScores {
                    player: "2".into(),
                    scores: strings(&["70", "71", "-2", "141"]),
                },
                PlayerScores {
                    player: "3".into(),
                    scores: strings(&["80"]),
                },
            ]
        );
        assert_eq!(record.pars, strings(&["72"]));
    }

    #[test]
    fn test_rows_without_tbody_and_without_header() {
        let html = r#"<table class="scorecard-table">
            <tr><td>DATE:</td><td>1/2/2023</td></tr>
            <tr><td>COURSE:</td></tr>
        </table>"#;
        let record = parse_scorecard(html, URL).unwrap();
        assert!(record.holes.is_empty());
        assert_eq!(record.date.as_deref(), Some("1/2/2023"));
        assert_eq!(record.course, None);
    }

    #[test]
    fn test_totals_from_five_scores() {
        let html = card_with_scores(&["4", "5", "9", "-1", "66"]);
        let record = parse_scorecard(&html, URL).unwrap();
        assert_eq!(record.total_score.as_deref(), Some("9"));
        assert_eq!(record.score_vs_par.as_deref(), Some("-1"));
        assert_eq!(record.gsp.as_deref(), Some("66"));
    }

    #[test]
    fn test_totals_from_three_scores_skip_total() {
        let html = card_with_scores(&["9", "-1", "66"]);
        let record = parse_scorecard(&html, URL).unwrap();
        assert_eq!(record.total_score, None);
        assert_eq!(record.score_vs_par.as_deref(), Some("-1"));
        assert_eq!(record.gsp.as_deref(), Some("66"));
    }

    #[test]
    fn test_totals_from_single_score() {
        let html = card_with_scores(&["66"]);
        let record = parse_scorecard(&html, URL).unwrap();
        assert_eq!(record.total_score, None);
        assert_eq!(record.score_vs_par, None);
        assert_eq!(record.gsp.as_deref(), Some("66"));
    }

    #[test]
    fn test_totals_from_empty_row() {
        let html = card_with_scores(&[]);
        let record = parse_scorecard(&html, URL).unwrap();
        assert_eq!(record.players[0].scores, Vec::<String>::new());
        assert_eq!(record.gsp, None);
    }

    #[test]
    fn test_non_youtube_video_keeps_raw_url() {
        let html = r#"<table class="scorecard-table"></table>
            <div class="card"><h3 class="card-header">Video</h3>
            <iframe src="https://player.vimeo.com/video/1"></iframe></div>"#;
        let record = parse_scorecard(html, URL).unwrap();
        assert_eq!(
            record.youtube_video.as_deref(),
            Some("https://player.vimeo.com/video/1")
        );
        assert_eq!(record.youtube_embed, None);
    }

    #[test]
    fn test_video_card_must_be_titled_video() {
        let html = r#"<table class="scorecard-table"></table>
            <div class="card"><h3 class="card-header">Stats</h3>
              <iframe src="https://www.youtube.com/embed/nope"></iframe></div>
            <div class="card"><h3 class="card-header">Video</h3>
              <iframe src="https://www.youtube.com/embed/yes"></iframe></div>"#;
        let record = parse_scorecard(html, URL).unwrap();
        assert_eq!(
            record.youtube_video.as_deref(),
            Some("https://www.youtube.com/watch?v=yes")
        );
    }

    #[test]
    fn test_row_tags() {
        assert_eq!(RowTag::classify("Distance"), RowTag::Distance);
        assert_eq!(RowTag::classify("par"), RowTag::Par);
        assert_eq!(RowTag::classify("Player 4"), RowTag::Player("4".into()));
        assert_eq!(RowTag::classify("Capture ID:"), RowTag::CaptureId);
        assert_eq!(RowTag::classify("PLAYER"), RowTag::Other);
        assert_eq!(RowTag::classify("PARS"), RowTag::Other);
    }
}
