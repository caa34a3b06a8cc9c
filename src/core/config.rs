use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Path to the JSON user store
/// Read from STORE_PATH environment variable
/// Default: users_data.json
pub static STORE_PATH: Lazy<String> =
    Lazy::new(|| env::var("STORE_PATH").unwrap_or_else(|_| "users_data.json".to_string()));

/// Path to the distributable application archive
/// Read from ASSET_PATH environment variable
/// Default: app.zip
pub static ASSET_PATH: Lazy<String> = Lazy::new(|| env::var("ASSET_PATH").unwrap_or_else(|_| "app.zip".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: bot.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "bot.log".to_string()));

/// Support contact shown in user-facing replies (a @handle or URL)
/// Read from SUPPORT_CONTACT environment variable; replies omit the
/// contact line when unset
pub static SUPPORT_CONTACT: Lazy<Option<String>> = Lazy::new(|| {
    env::var("SUPPORT_CONTACT").ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
});

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable.
/// There is deliberately no fallback literal; see [`require_bot_token`].
pub static BOT_TOKEN: Lazy<Option<String>> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .ok()
        .and_then(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
});

/// Returns the configured bot token or fails.
///
/// Startup must refuse to run without a token instead of limping along with
/// an unauthenticated client.
pub fn require_bot_token() -> anyhow::Result<String> {
    BOT_TOKEN
        .clone()
        .ok_or_else(|| anyhow::anyhow!("BOT_TOKEN (or TELOXIDE_TOKEN) is not set; refusing to start"))
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API HTTP requests (in seconds)
    /// Generous because /download uploads the whole archive in one request
    pub const REQUEST_TIMEOUT_SECS: u64 = 300;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Long-polling configuration
pub mod polling {
    use super::Duration;

    /// Poll timeout for the update listener (in seconds)
    pub const POLL_TIMEOUT_SECS: u64 = 60;

    /// Poll timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(POLL_TIMEOUT_SECS)
    }
}

/// Supervisor retry configuration
pub mod retry {
    use super::Duration;

    /// Delay before reconnecting after a messaging-loop failure (in seconds)
    pub const RETRY_DELAY_SECS: u64 = 10;

    /// Retry delay duration
    pub fn delay() -> Duration {
        Duration::from_secs(RETRY_DELAY_SECS)
    }
}

/// Status web server configuration
pub mod web {
    use once_cell::sync::Lazy;
    use std::env;

    /// Enable the status web server
    /// Read from WEB_ENABLED environment variable
    /// Default: true
    pub static ENABLED: Lazy<bool> =
        Lazy::new(|| env::var("WEB_ENABLED").ok().and_then(|v| v.parse().ok()).unwrap_or(true));

    /// Port for the status web server
    /// Read from WEB_PORT environment variable
    /// Default: 8080
    pub static PORT: Lazy<u16> =
        Lazy::new(|| env::var("WEB_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(8080));
}

/// Periodic stats report configuration
pub mod report {
    use once_cell::sync::Lazy;
    use std::env;

    /// Hours between daily summary reports (0 disables the reporter)
    /// Read from STATS_REPORT_INTERVAL_HOURS environment variable
    /// Default: 24
    pub static INTERVAL_HOURS: Lazy<u64> = Lazy::new(|| {
        env::var("STATS_REPORT_INTERVAL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24)
    });

    /// Chat that receives the daily summary in addition to the log
    /// Read from ADMIN_CHAT_ID environment variable
    pub static ADMIN_CHAT_ID: Lazy<Option<i64>> =
        Lazy::new(|| env::var("ADMIN_CHAT_ID").ok().and_then(|v| v.parse().ok()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_are_set() {
        assert!(!STORE_PATH.is_empty());
        assert!(!ASSET_PATH.is_empty());
    }

    #[test]
    fn retry_delay_is_fixed_ten_seconds() {
        assert_eq!(retry::delay(), Duration::from_secs(10));
    }
}
