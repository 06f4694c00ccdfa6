//! Decides which game titles are collected.

/// Tracked titles, matched case-insensitively as substrings of the page
/// title. New releases get appended here.
pub const TRACKED_TITLES: &[&str] = &[
    "golden tee unplugged 2018",
    "golden tee live 2018",
    "golden tee unplugged 2017",
    "golden tee live 2017",
    "golden tee unplugged 2016",
    "power putt live 2013",
    "golden tee live 2007",
    "golden tee live 2006",
];

/// Returns `true` if any entry of [`TRACKED_TITLES`] occurs in `title`.
/// Missing and empty titles are never tracked.
pub fn is_tracked(title: Option<&str>) -> bool {
    let Some(title) = title.filter(|t| !t.is_empty()) else {
        return false;
    };
    let title = title.to_lowercase();
    TRACKED_TITLES.iter().any(|tracked| title.contains(tracked))
}
