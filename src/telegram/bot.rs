//! Bot initialization and command definitions.

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config;

/// Bot commands with descriptions shown in the Telegram UI
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "What I can do:")]
pub enum Command {
    #[command(description = "greeting and live usage numbers")]
    Start,
    #[command(description = "usage statistics")]
    Stats,
    #[command(description = "download the application")]
    Download,
    #[command(description = "help and install instructions")]
    Help,
}

/// Creates a Bot instance with a transport timeout sized for archive
/// uploads.
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Failed to build the HTTP client
pub fn create_bot(token: &str) -> anyhow::Result<Bot> {
    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    Ok(Bot::with_client(token, client))
}

/// Registers the command list in the Telegram UI.
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse_from_message_text() {
        let me = "bot";
        assert_eq!(Command::parse("/start", me).ok(), Some(Command::Start));
        assert_eq!(Command::parse("/stats", me).ok(), Some(Command::Stats));
        assert_eq!(Command::parse("/download", me).ok(), Some(Command::Download));
        assert_eq!(Command::parse("/help", me).ok(), Some(Command::Help));
        assert!(Command::parse("/unknown", me).is_err());
    }

    #[test]
    fn command_descriptions_cover_every_command() {
        let listing = Command::descriptions().to_string();
        assert!(listing.contains("start"));
        assert!(listing.contains("stats"));
        assert!(listing.contains("download"));
        assert!(listing.contains("help"));
    }
}
