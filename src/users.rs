//! Loading the list of user identifiers to scrape.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{Result, ScrapeError};

/// CSV columns that may hold the identifier, highest priority first.
const CSV_COLUMNS: &[&str] = &["user_id", "username", "queryId", "id"];

/// Identifier file formats, picked by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::EnumString, strum_macros::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SourceFormat {
    Json,
    Csv,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| SourceFormat::from_str(ext).ok())
            .ok_or_else(|| ScrapeError::UnsupportedFormat(path.to_path_buf()))
    }
}

/// Read identifiers from `path`. Problems are logged and yield an empty
/// list; the caller decides what an empty list means.
pub fn load_user_ids(path: &Path) -> Vec<String> {
    match read_user_ids(path) {
        Ok(ids) if ids.is_empty() => {
            warn!(path = %path.display(), "no user ids found, check the file format");
            ids
        }
        Ok(ids) => {
            info!(count = ids.len(), path = %path.display(), "loaded users");
            ids
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not load user ids");
            Vec::new()
        }
    }
}

/// Like [`load_user_ids`] but reports why nothing could be read.
pub fn read_user_ids(path: &Path) -> Result<Vec<String>> {
    let format = SourceFormat::from_path(path)?;
    let contents = std::fs::read_to_string(path).map_err(|source| ScrapeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match format {
        SourceFormat::Json => parse_json_ids(&contents),
        SourceFormat::Csv => parse_csv_ids(contents.as_bytes()),
    }
}

/// An `id` value inside an object entry.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Deserialize)]
struct IdEntry {
    id: RawId,
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Accepts a list of strings, a list of `{"id": ..}` objects, or either of
/// those under a `users` or `players` key. Anything else yields no ids.
pub fn parse_json_ids(contents: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(contents)?;
    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove("users").or_else(|| map.remove("players")) {
            Some(list) => list,
            None => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };

    if let Ok(ids) = Vec::<String>::deserialize(&list) {
        return Ok(ids);
    }
    Ok(Vec::<IdEntry>::deserialize(&list)
        .map(|entries| entries.into_iter().map(|e| e.id.into()).collect())
        .unwrap_or_default())
}

/// Takes, per row, the first non-empty value among [`CSV_COLUMNS`].
pub fn parse_csv_ids<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();
    let columns: Vec<usize> = CSV_COLUMNS
        .iter()
        .filter_map(|name| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == *name)
        })
        .collect();

    let mut ids = Vec::new();
    for row in reader.records() {
        let row = row?;
        if let Some(id) = columns
            .iter()
            .filter_map(|&i| row.get(i))
            .find(|v| !v.is_empty())
        {
            ids.push(id.to_string());
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_flat_list() {
        let ids = parse_json_ids(r#"["a", "b", "a"]"#).unwrap();
        assert_eq!(ids, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_json_users_and_players_keys() {
        assert_eq!(parse_json_ids(r#"{"users": ["x"]}"#).unwrap(), vec!["x"]);
        assert_eq!(parse_json_ids(r#"{"players": ["y"]}"#).unwrap(), vec!["y"]);
    }

    #[test]
    fn test_json_objects_with_id() {
        let ids = parse_json_ids(r#"{"players": [{"id": "p1", "name": "Ace"}, {"id": 42}]}"#)
            .unwrap();
        assert_eq!(ids, vec!["p1", "42"]);

        let ids = parse_json_ids(r#"[{"id": "top"}]"#).unwrap();
        assert_eq!(ids, vec!["top"]);
    }

    #[test]
    fn test_json_unrecognized_shapes() {
        assert!(parse_json_ids(r#"{"people": ["x"]}"#).unwrap().is_empty());
        assert!(parse_json_ids(r#"["x", 1]"#).unwrap().is_empty());
        assert!(parse_json_ids(r#""x""#).unwrap().is_empty());
        assert!(parse_json_ids("{not json").is_err());
    }

    #[test]
    fn test_csv_column_priority() {
        let csv = "\u{feff}id,username,user_id\n1,bob,\n2,,u2\n,,\n3,,\n";
        let ids = parse_csv_ids(csv.as_bytes()).unwrap();
        assert_eq!(ids, vec!["bob", "u2", "3"]);
    }

    #[test]
    fn test_csv_query_id_column() {
        let csv = "name,queryId\nAce,abc\n";
        assert_eq!(parse_csv_ids(csv.as_bytes()).unwrap(), vec!["abc"]);
    }

    #[test]
    fn test_csv_without_known_columns() {
        let csv = "name,score\nAce,70\n";
        assert!(parse_csv_ids(csv.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_source_format_from_path() {
        assert_eq!(
            SourceFormat::from_path(Path::new("users.JSON")).unwrap(),
            SourceFormat::Json
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("dir/users.csv")).unwrap(),
            SourceFormat::Csv
        );
        assert!(SourceFormat::from_path(Path::new("users.txt")).is_err());
        assert!(SourceFormat::from_path(Path::new("users")).is_err());
    }

    #[test]
    fn test_missing_file_yields_nothing() {
        assert!(load_user_ids(Path::new("/definitely/not/here/users.json")).is_empty());
        assert!(matches!(
            read_user_ids(Path::new("/definitely/not/here/users.json")),
            Err(ScrapeError::Io { .. })
        ));
    }
}
