pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;

/// Content type of an incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modality {
    Text,
    Photo,
    Video,
    Animation,
    Audio,
    Document,
    Sticker,
    Voice,
    VideoNote,
    Contact,
    Location,
    Venue,
    Dice,
    Poll,
    /// Anything else the platform delivers (service messages, invoices, ...).
    Unsupported(&'static str),
}

impl Modality {
    /// Whether the message can be resent with the generic copy operation.
    pub fn is_copyable(&self) -> bool {
        !matches!(self, Modality::Poll | Modality::Unsupported(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Modality::Text => "text",
            Modality::Photo => "photo",
            Modality::Video => "video",
            Modality::Animation => "animation",
            Modality::Audio => "audio",
            Modality::Document => "document",
            Modality::Sticker => "sticker",
            Modality::Voice => "voice",
            Modality::VideoNote => "video_note",
            Modality::Contact => "contact",
            Modality::Location => "location",
            Modality::Venue => "venue",
            Modality::Dice => "dice",
            Modality::Poll => "poll",
            Modality::Unsupported(kind) => *kind,
        }
    }
}

/// A message received from the platform
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Chat the message arrived in; replies go back here
    pub chat_id: i64,
    pub message_id: i32,
    /// Full display name of the sender, if the platform reports one
    pub sender_name: Option<String>,
    /// Message text, or the media caption
    pub text: Option<String>,
    pub modality: Modality,
}

/// Result of trying to resend a message as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Unsupported(String),
}

/// Outbound side of the transport, as seen by handlers.
#[async_trait]
pub trait Outbound: Send + Sync {
    /// Send text to a chat. Markup is interpreted per the transport's default
    /// parse mode (HTML for Telegram).
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;

    /// Resend `message` into its own chat, preserving its modality.
    ///
    /// Returns `CopyOutcome::Unsupported` without touching the network when
    /// the modality cannot be copied. Transport failures are errors.
    async fn copy_message(&self, message: &IncomingMessage) -> Result<CopyOutcome>;
}
