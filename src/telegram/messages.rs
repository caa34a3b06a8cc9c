//! Templated user-facing replies.
//!
//! Plain-text templates; the support contact line is appended only when
//! SUPPORT_CONTACT is configured.

use chrono::Local;

use crate::core::config;
use crate::core::error::AppError;
use crate::core::stats::{render_top, StatsSnapshot};

/// Reply for /download when the archive was absent at startup.
pub const ASSET_UNAVAILABLE: &str = "❌ The application file is temporarily unavailable. Please try again later.";

/// Follow-up sent after a successful /download.
pub const DOWNLOAD_CONFIRMATION: &str =
    "✅ File sent! Check the attachment above.\n\nIf the download failed, run /download again.";

/// Greeting for /start, embedding live totals.
pub fn greeting(first_name: &str, total_users: usize, active_today: usize) -> String {
    format!(
        "👋 Hi, {first_name}!\n\n\
         I distribute the application and keep track of who grabbed it.\n\n\
         📊 Right now:\n\
         • Registered users: {total_users}\n\
         • Active today: {active_today}\n\n\
         ✨ Commands:\n\
         /start - this greeting\n\
         /stats - usage statistics\n\
         /download - get the application\n\
         /help - help and instructions{support}",
        support = support_line()
    )
}

/// Statistics report for /stats.
pub fn stats_report(snapshot: &StatsSnapshot) -> String {
    format!(
        "📈 BOT STATISTICS\n\n\
         👥 Users:\n\
         • Registered: {total_users}\n\
         • Active today: {active_today}\n\n\
         📥 Downloads:\n\
         • Total: {total_downloads}\n\n\
         🏆 Top-5 downloaders:\n\
         {top}\n\n\
         🔄 Report generated: {generated}",
        total_users = snapshot.total_users,
        active_today = snapshot.active_today,
        total_downloads = snapshot.total_downloads,
        top = render_top(&snapshot.top_downloaders),
        generated = Local::now().format("%d.%m.%Y %H:%M"),
    )
}

/// Help and install instructions for /help.
pub fn help_text() -> String {
    format!(
        "🆘 HELP AND INSTRUCTIONS\n\n\
         📋 Commands:\n\
         /start - start working with the bot\n\
         /stats - usage statistics\n\
         /download - get the application\n\
         /help - this help\n\n\
         📥 Installing the application:\n\
         1. Run /download\n\
         2. Save the archive on your computer\n\
         3. Unpack it with any archive tool\n\
         4. Run the executable from the unpacked folder\n\n\
         ⚠️ Common issues:\n\
         • Antivirus blocks the file - add it to the exclusions\n\
         • Archive looks corrupted - download it again{support}",
        support = support_line()
    )
}

/// Caption attached to the archive document.
pub fn asset_caption(size_mb: f64) -> String {
    format!(
        "📦 Your application is ready!\n\n\
         📝 Install steps:\n\
         1. Download this archive\n\
         2. Unpack it into any folder\n\
         3. Run the executable from the unpacked folder\n\n\
         ⚠️ Notes:\n\
         • Your antivirus may ask for confirmation\n\
         • Keep the unpacked files together\n\
         • Archive size: {size_mb:.1} MB{support}",
        support = support_line()
    )
}

/// Reply to a /download that failed mid-transfer.
pub fn delivery_error(err: &AppError) -> String {
    format!("❌ Failed to send the file: {err}")
}

/// Default reply for plain text, naming the caller.
pub fn unknown_text(first_name: &str) -> String {
    format!(
        "Hi, {first_name}! 👋\n\n\
         I only understand commands. Try:\n\
         /start - to get started\n\
         /help - for instructions"
    )
}

fn support_line() -> String {
    match config::SUPPORT_CONTACT.as_deref() {
        Some(contact) => format!("\n\n💬 Support: {contact}"),
        None => String::new(),
    }
}
