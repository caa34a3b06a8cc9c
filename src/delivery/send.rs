//! Sending the archive to a requesting chat.

use teloxide::prelude::*;
use teloxide::types::{ChatAction, InputFile, Message};

use super::Asset;
use crate::core::error::AppResult;
use crate::telegram::handlers::types::{HandlerDeps, HandlerError};
use crate::telegram::messages;

/// Handles a /download request end to end.
///
/// Unavailable archive: apology, no file access. Otherwise: upload
/// indicator, document with captioned size, counter bump, confirmation.
/// A failed transfer is reported to the user with the failure detail and
/// does not bump the counter.
pub async fn send_asset(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let chat_id = msg.chat.id;

    if !deps.asset.available() {
        bot.send_message(chat_id, messages::ASSET_UNAVAILABLE).await?;
        return Ok(());
    }

    bot.send_chat_action(chat_id, ChatAction::UploadDocument).await?;

    match deliver(bot, chat_id, &deps.asset).await {
        Ok(()) => {
            if let Some(from) = msg.from.as_ref() {
                let id = from.id.0.to_string();
                let mut store = deps.store.lock().await;
                store.touch(&id);
                store.increment_download(&id);
            }
            bot.send_message(chat_id, messages::DOWNLOAD_CONFIRMATION).await?;
            log::info!("chat {} received the application archive", chat_id);
        }
        Err(e) => {
            log::error!("failed to send the archive to chat {}: {}", chat_id, e);
            bot.send_message(chat_id, messages::delivery_error(&e)).await?;
        }
    }

    Ok(())
}

async fn deliver(bot: &Bot, chat_id: ChatId, asset: &Asset) -> AppResult<()> {
    let size_mb = asset.current_size_mb()?;

    bot.send_document(chat_id, InputFile::file(asset.path().to_path_buf()))
        .caption(messages::asset_caption(size_mb))
        .await?;

    Ok(())
}
