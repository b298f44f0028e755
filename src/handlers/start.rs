use anyhow::Result;
use async_trait::async_trait;
use teloxide::utils::html;

use crate::platform::{IncomingMessage, Outbound};
use crate::router::Handler;

const COMMAND: &str = "start";

/// Name used when the platform does not report who sent the message.
const ANONYMOUS_NAME: &str = "there";

/// Whether the message is the `/start` command.
///
/// Looks at the first whitespace-separated token of the text or caption:
/// `/start` and `/start@<bot_username>` match, with or without arguments.
/// The mention is compared case-insensitively; when the bot's own username is
/// unknown any mention is accepted.
pub fn is_start_command(message: &IncomingMessage, bot_username: Option<&str>) -> bool {
    let Some(text) = message.text.as_deref() else {
        return false;
    };
    let Some(token) = text.split_whitespace().next() else {
        return false;
    };
    let Some(command) = token.strip_prefix('/') else {
        return false;
    };

    let (name, mention) = match command.split_once('@') {
        Some((name, mention)) => (name, Some(mention)),
        None => (command, None),
    };
    if name != COMMAND {
        return false;
    }

    match (mention, bot_username) {
        (None, _) | (Some(_), None) => true,
        (Some(mention), Some(username)) => mention.eq_ignore_ascii_case(username),
    }
}

/// Greets the sender by name, in bold, with the name HTML-escaped.
pub struct StartHandler {
    greeting: String,
}

impl StartHandler {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            greeting: greeting.into(),
        }
    }

    pub fn greeting_for(&self, name: Option<&str>) -> String {
        let name = name.unwrap_or(ANONYMOUS_NAME);
        format!("{}, {}!", self.greeting, html::bold(&html::escape(name)))
    }
}

#[async_trait]
impl Handler for StartHandler {
    async fn handle(&self, message: &IncomingMessage, out: &dyn Outbound) -> Result<()> {
        let text = self.greeting_for(message.sender_name.as_deref());
        out.send_text(message.chat_id, &text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::{message, RecordingOutbound, Sent};
    use crate::platform::Modality;

    fn text(t: &str) -> IncomingMessage {
        message(Modality::Text, Some(t), Some("Ann"))
    }

    #[test]
    fn test_plain_start_matches() {
        assert!(is_start_command(&text("/start"), Some("echo_bot")));
        assert!(is_start_command(&text("/start"), None));
    }

    #[test]
    fn test_start_with_argument_matches() {
        assert!(is_start_command(&text("/start deep-link-payload"), Some("echo_bot")));
    }

    #[test]
    fn test_mention_must_name_this_bot() {
        assert!(is_start_command(&text("/start@Echo_Bot"), Some("echo_bot")));
        assert!(!is_start_command(&text("/start@other_bot"), Some("echo_bot")));
        assert!(is_start_command(&text("/start@other_bot"), None));
    }

    #[test]
    fn test_other_text_does_not_match() {
        assert!(!is_start_command(&text("start"), None));
        assert!(!is_start_command(&text("/started"), None));
        assert!(!is_start_command(&text("/START"), None));
        assert!(!is_start_command(&text("hi /start"), None));
        assert!(!is_start_command(&text(""), None));
        assert!(!is_start_command(&message(Modality::Sticker, None, None), None));
    }

    #[test]
    fn test_caption_counts_as_command() {
        let photo = message(Modality::Photo, Some("/start"), Some("Ann"));
        assert!(is_start_command(&photo, None));
    }

    #[test]
    fn test_greeting_bolds_name() {
        let handler = StartHandler::new("Hello");
        assert_eq!(handler.greeting_for(Some("Ann")), "Hello, <b>Ann</b>!");
    }

    #[test]
    fn test_greeting_escapes_markup() {
        let handler = StartHandler::new("Hello");
        assert_eq!(
            handler.greeting_for(Some("<script>")),
            "Hello, <b>&lt;script&gt;</b>!"
        );
        assert_eq!(
            handler.greeting_for(Some("Tom & Jerry")),
            "Hello, <b>Tom &amp; Jerry</b>!"
        );
    }

    #[test]
    fn test_greeting_without_sender() {
        let handler = StartHandler::new("Hello");
        assert_eq!(handler.greeting_for(None), "Hello, <b>there</b>!");
    }

    #[tokio::test]
    async fn test_replies_to_same_chat() {
        let handler = StartHandler::new("Hello");
        let out = RecordingOutbound::default();

        handler.handle(&text("/start"), &out).await.unwrap();

        assert_eq!(
            out.take().await,
            vec![Sent::Text {
                chat_id: 42,
                text: "Hello, <b>Ann</b>!".to_string()
            }]
        );
    }
}
