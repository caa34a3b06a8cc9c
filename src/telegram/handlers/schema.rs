//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::commands::{
    handle_download_command, handle_help_command, handle_start_command, handle_stats_command, handle_text_message,
};
use super::types::{HandlerDeps, HandlerError};
use crate::telegram::bot::Command;

/// Creates the main dispatcher schema for the bot.
///
/// The returned handler tree is used by the polling dispatcher and, via
/// the webhook forwarder, by the HTTP ingestion path; both routes run
/// through the same branches.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry().branch(command_handler(deps)).branch(text_handler())
}

/// Handler for bot commands (/start, /stats, /download, /help)
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("received command {:?} from chat {}", cmd, msg.chat.id);
                match cmd {
                    Command::Start => handle_start_command(&bot, &msg, &deps).await?,
                    Command::Stats => handle_stats_command(&bot, &msg, &deps).await?,
                    Command::Download => handle_download_command(&bot, &msg, &deps).await?,
                    Command::Help => handle_help_command(&bot, &msg, &deps).await?,
                }
                Ok(())
            }
        },
    ))
}

/// Fallback handler for plain text messages
fn text_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().is_some())
        .endpoint(|bot: Bot, msg: Message| async move {
            handle_text_message(&bot, &msg).await?;
            Ok(())
        })
}
