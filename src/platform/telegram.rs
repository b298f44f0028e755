use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::adaptors::DefaultParseMode;
use teloxide::prelude::*;
use teloxide::requests::RequesterExt;
use teloxide::types::{MediaKind, MessageId, MessageKind, ParseMode};
use tracing::{debug, info};

use crate::platform::{CopyOutcome, IncomingMessage, Modality, Outbound};
use crate::router::Router;

/// Bot client whose outgoing text is parsed as HTML unless told otherwise.
pub type HtmlBot = DefaultParseMode<Bot>;

pub fn html_bot(token: &str) -> HtmlBot {
    Bot::new(token).parse_mode(ParseMode::Html)
}

fn modality_of(msg: &Message) -> Modality {
    // Venue and animation messages also carry location/document payloads,
    // so they are checked first.
    if msg.text().is_some() {
        Modality::Text
    } else if msg.photo().is_some() {
        Modality::Photo
    } else if msg.video().is_some() {
        Modality::Video
    } else if msg.animation().is_some() {
        Modality::Animation
    } else if msg.audio().is_some() {
        Modality::Audio
    } else if msg.document().is_some() {
        Modality::Document
    } else if msg.sticker().is_some() {
        Modality::Sticker
    } else if msg.voice().is_some() {
        Modality::Voice
    } else if msg.video_note().is_some() {
        Modality::VideoNote
    } else if msg.contact().is_some() {
        Modality::Contact
    } else if msg.venue().is_some() {
        Modality::Venue
    } else if msg.location().is_some() {
        Modality::Location
    } else if msg.dice().is_some() {
        Modality::Dice
    } else if msg.poll().is_some() {
        Modality::Poll
    } else {
        Modality::Unsupported(unsupported_kind(msg))
    }
}

fn unsupported_kind(msg: &Message) -> &'static str {
    match &msg.kind {
        MessageKind::Common(common) => match &common.media_kind {
            MediaKind::Game(_) => "game",
            MediaKind::Story(_) => "story",
            _ => "media",
        },
        MessageKind::Invoice(_) => "invoice",
        MessageKind::Giveaway(_) => "giveaway",
        MessageKind::GiveawayCreated(_) => "giveaway_created",
        MessageKind::GiveawayCompleted(_) => "giveaway_completed",
        MessageKind::GiveawayWinners(_) => "giveaway_winners",
        _ => "service",
    }
}

/// Every update maps to the same key, so the dispatcher runs them one at a
/// time in arrival order instead of one worker per chat.
fn sequential_key(_: &Update) -> Option<()> {
    Some(())
}

impl From<&Message> for IncomingMessage {
    fn from(msg: &Message) -> Self {
        let sender_name = msg.from.as_ref().map(|user| user.full_name()).or_else(|| {
            msg.sender_chat
                .as_ref()
                .and_then(|chat| chat.title())
                .map(str::to_string)
        });

        Self {
            chat_id: msg.chat.id.0,
            message_id: msg.id.0,
            sender_name,
            text: msg.text().or_else(|| msg.caption()).map(str::to_string),
            modality: modality_of(msg),
        }
    }
}

/// `Outbound` backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramOutbound {
    bot: HtmlBot,
}

impl TelegramOutbound {
    pub fn new(bot: HtmlBot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Outbound for TelegramOutbound {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .with_context(|| format!("Failed to send message to chat {}", chat_id))?;
        Ok(())
    }

    async fn copy_message(&self, message: &IncomingMessage) -> Result<CopyOutcome> {
        if !message.modality.is_copyable() {
            return Ok(CopyOutcome::Unsupported(format!(
                "{} messages cannot be copied",
                message.modality.name()
            )));
        }

        let chat = ChatId(message.chat_id);
        self.bot
            .copy_message(chat, chat, MessageId(message.message_id))
            .await
            .with_context(|| {
                format!(
                    "Failed to copy message {} in chat {}",
                    message.message_id, message.chat_id
                )
            })?;
        Ok(CopyOutcome::Copied)
    }
}

/// Long-poll Telegram and feed every message through `router`.
///
/// Updates are handled one at a time in arrival order. Returns once polling
/// stops (Ctrl-C).
pub async fn run(bot: HtmlBot, router: Arc<Router>) -> Result<()> {
    let outbound: Arc<dyn Outbound> = Arc::new(TelegramOutbound::new(bot.clone()));

    info!("Starting Telegram long polling...");

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![router, outbound])
        .distribution_function(sequential_key)
        .default_handler(|upd| async move {
            debug!("Ignoring non-message update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Polling stopped");
    Ok(())
}

async fn handle_message(
    msg: Message,
    router: Arc<Router>,
    outbound: Arc<dyn Outbound>,
) -> Result<()> {
    let incoming = IncomingMessage::from(&msg);
    router.dispatch(&incoming, outbound.as_ref()).await?;
    Ok(())
}
