//! Command handler implementations (/start, /stats, /download, /help)

use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{HandlerDeps, HandlerError};
use crate::core::stats;
use crate::delivery::send_asset;
use crate::telegram::messages;

/// Handle /start: register or refresh the caller, then greet with live
/// totals.
pub(super) async fn handle_start_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let greeting = {
        let mut store = deps.store.lock().await;
        if let Some(from) = msg.from.as_ref() {
            store.upsert(
                &from.id.0.to_string(),
                from.username.clone(),
                &from.first_name,
                from.last_name.clone(),
            );
        }
        messages::greeting(caller_name(msg), store.total_users(), store.active_today())
    };

    bot.send_message(msg.chat.id, greeting).await?;
    Ok(())
}

/// Handle /stats: refresh the caller's activity, then reply with the
/// aggregate report.
pub(super) async fn handle_stats_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let report = {
        let mut store = deps.store.lock().await;
        if let Some(from) = msg.from.as_ref() {
            store.touch(&from.id.0.to_string());
        }
        messages::stats_report(&stats::snapshot(&store))
    };

    bot.send_message(msg.chat.id, report).await?;
    Ok(())
}

/// Handle /download: delegate to the delivery module.
pub(super) async fn handle_download_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    send_asset(bot, msg, deps).await
}

/// Handle /help: refresh activity and send the instructions.
pub(super) async fn handle_help_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    {
        let mut store = deps.store.lock().await;
        if let Some(from) = msg.from.as_ref() {
            store.touch(&from.id.0.to_string());
        }
    }

    bot.send_message(msg.chat.id, messages::help_text()).await?;
    Ok(())
}

/// Default branch for plain text: point the caller at the commands.
pub(super) async fn handle_text_message(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, messages::unknown_text(caller_name(msg))).await?;
    Ok(())
}

fn caller_name(msg: &Message) -> &str {
    msg.from.as_ref().map(|u| u.first_name.as_str()).unwrap_or("there")
}
