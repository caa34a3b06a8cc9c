//! Read-side statistics over the user store.
//!
//! The same snapshot feeds the /stats chat reply, the /stats JSON route,
//! and the HTML status page.

use serde::Serialize;

use crate::storage::Store;

/// Entries shown in the downloader ranking
pub const TOP_DOWNLOADERS_LIMIT: usize = 5;

/// One entry of the downloader ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopDownloader {
    pub name: String,
    pub downloads: u64,
}

/// Aggregates derived from the store at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub total_users: usize,
    pub active_today: usize,
    pub total_downloads: u64,
    pub top_downloaders: Vec<TopDownloader>,
}

/// Builds a snapshot of the current aggregates.
pub fn snapshot(store: &Store) -> StatsSnapshot {
    StatsSnapshot {
        total_users: store.total_users(),
        active_today: store.active_today(),
        total_downloads: store.total_downloads(),
        top_downloaders: store
            .top_downloaders(TOP_DOWNLOADERS_LIMIT)
            .into_iter()
            .map(|(name, downloads)| TopDownloader { name, downloads })
            .collect(),
    }
}

/// Renders the ranking as a 1-indexed "name: count" list, or a placeholder
/// line when nobody has downloaded anything yet.
pub fn render_top(top: &[TopDownloader]) -> String {
    if top.is_empty() {
        return "No downloads recorded yet".to_string();
    }

    let mut out = String::new();
    for (idx, entry) in top.iter().enumerate() {
        out.push_str(&format!("{}. {}: {}\n", idx + 1, entry.name, entry.downloads));
    }
    out.trim_end().to_string()
}
