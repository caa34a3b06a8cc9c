//! Periodic daily statistics summary.
//!
//! Renders a summary on a fixed interval, always logs it, and sends it to
//! the admin chat when one is configured.

use chrono::Local;
use std::time::Duration;
use teloxide::prelude::*;
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::core::config;
use crate::storage::{SharedStore, Store};

/// Starts the reporter task. Returns `None` when `interval_hours` is 0.
pub fn start_stats_reporter(bot: Bot, store: SharedStore, interval_hours: u64) -> Option<JoinHandle<()>> {
    if interval_hours == 0 {
        log::info!("stats reporter disabled (STATS_REPORT_INTERVAL_HOURS=0)");
        return None;
    }

    log::info!("stats reporter started (every {} hour(s))", interval_hours);

    Some(tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(interval_hours * 60 * 60));
        // The first tick fires immediately; skip it so the first report
        // lands a full interval after startup.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let summary = {
                let store = store.lock().await;
                render_daily_summary(&store)
            };
            log::info!("daily summary:\n{}", summary);

            if let Some(chat_id) = *config::report::ADMIN_CHAT_ID {
                if let Err(e) = bot.send_message(ChatId(chat_id), summary).await {
                    log::error!("failed to send daily summary to admin chat {}: {}", chat_id, e);
                }
            }
        }
    }))
}

/// Renders the daily summary text.
pub fn render_daily_summary(store: &Store) -> String {
    format!(
        "📊 DAILY SUMMARY\n\
         Date: {date}\n\n\
         👥 Users: {total_users}\n\
         🟢 Active today: {active_today}\n\
         🆕 New users today: {new_users_today}\n\
         📥 Total downloads: {total_downloads}",
        date = Local::now().format("%d.%m.%Y"),
        total_users = store.total_users(),
        active_today = store.active_today(),
        new_users_today = store.new_users_today(),
        total_downloads = store.total_downloads(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn summary_lists_all_counters() {
        let dir = tempdir().unwrap();
        let mut store = Store::load(dir.path().join("users.json"));
        store.upsert("1", None, "Ann", None);
        store.increment_download("1");

        let summary = render_daily_summary(&store);
        assert!(summary.contains("Users: 1"));
        assert!(summary.contains("Active today: 1"));
        assert!(summary.contains("New users today: 1"));
        assert!(summary.contains("Total downloads: 1"));
    }
}
