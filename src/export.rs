//! CSV and JSON output of collected records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::SecondsFormat;
use tracing::info;

use crate::error::{Result, ScrapeError};
use crate::model::ScorecardRecord;

/// Fixed leading columns of the flat export.
pub const CSV_COLUMNS: [&str; 12] = [
    "game",
    "username",
    "query_user_id",
    "course",
    "date",
    "capture_id",
    "total_score",
    "score_vs_par",
    "gsp",
    "youtube_video",
    "entry_url",
    "scraped_at",
];

/// Per-hole scores of player 1.
///
/// Score `i` lines up with header cell `i + 1` (cell 0 labels the row
/// column). Scores are taken while that header cell is a hole number; the
/// first missing or non-numeric header ends the walk, which leaves out the
/// total columns at the end of the row.
pub fn hole_scores(record: &ScorecardRecord) -> Vec<&str> {
    let Some(scores) = record.primary_scores() else {
        return Vec::new();
    };
    scores
        .iter()
        .zip(record.holes.iter().skip(1))
        .take_while(|(_, header)| is_hole_number(header))
        .map(|(score, _)| score.as_str())
        .collect()
}

fn is_hole_number(header: &str) -> bool {
    !header.is_empty() && header.chars().all(|c| c.is_ascii_digit())
}

/// Write one CSV row per record. The `hole_N` columns cover the longest
/// hole sequence found across all records.
pub fn write_csv<W: Write>(records: &[ScorecardRecord], writer: W) -> Result<()> {
    let holes: Vec<Vec<&str>> = records.iter().map(hole_scores).collect();
    let hole_count = holes.iter().map(Vec::len).max().unwrap_or_default();

    let mut writer = csv::Writer::from_writer(writer);
    let hole_headers = (1..=hole_count).map(|n| format!("hole_{n}"));
    writer.write_record(
        CSV_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(hole_headers),
    )?;

    for (record, holes) in records.iter().zip(&holes) {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        let scraped_at = record
            .scraped_at
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_default();
        let fixed = [
            opt(&record.game),
            opt(&record.username),
            opt(&record.query_user_id),
            opt(&record.course),
            opt(&record.date),
            opt(&record.capture_id),
            opt(&record.total_score),
            opt(&record.score_vs_par),
            opt(&record.gsp),
            opt(&record.youtube_video),
            record.entry_url.clone(),
            scraped_at,
        ];
        let hole_cells =
            (0..hole_count).map(|i| holes.get(i).copied().unwrap_or_default().to_string());
        writer.write_record(fixed.into_iter().chain(hole_cells))?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write all records as a pretty-printed JSON array.
pub fn write_json<W: Write>(records: &[ScorecardRecord], writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}

pub fn save_csv(records: &[ScorecardRecord], path: &Path) -> Result<()> {
    write_csv(records, create(path)?)?;
    info!(path = %path.display(), count = records.len(), "saved csv");
    Ok(())
}

pub fn save_json(records: &[ScorecardRecord], path: &Path) -> Result<()> {
    let mut writer = create(path)?;
    write_json(records, &mut writer)?;
    writer.flush().map_err(|source| ScrapeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), count = records.len(), "saved json");
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ScrapeError::Io {
            path: path.to_path_buf(),
            source,
        })
}
