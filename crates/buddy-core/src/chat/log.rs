//! Per-session, in-memory chat log.

use super::message::{ChatMessage, Sender};
use crate::buddy::{Buddy, FALLBACK_WELCOME_MESSAGE};
use crate::session::SessionToken;

/// Builds the first message of a fresh chat with `buddy`.
pub fn greeting(buddy: &Buddy) -> String {
    format!(
        "Hi there! I'm {}, your AI buddy. {}",
        buddy.name,
        buddy
            .welcome_message
            .as_deref()
            .unwrap_or(FALLBACK_WELCOME_MESSAGE)
    )
}

/// Ordered messages of one chat session.
///
/// Never persisted; dropped when the session ends.
#[derive(Debug, Clone)]
pub struct ChatLog {
    token: SessionToken,
    messages: Vec<ChatMessage>,
    typing: bool,
}

impl ChatLog {
    /// Starts a log for `token` with the buddy's greeting.
    pub fn start(token: SessionToken, buddy: &Buddy) -> Self {
        let mut welcome = ChatMessage::buddy(greeting(buddy));
        welcome.id = "welcome".to_string();
        Self {
            token,
            messages: vec![welcome],
            typing: false,
        }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// True while a reply is pending.
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Appends a user message and marks a reply as pending.
    pub fn push_user(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.typing = true;
        self.push(ChatMessage::new(Sender::User, text))
    }

    /// Appends a buddy reply and clears the pending flag.
    pub fn push_reply(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.typing = false;
        self.push(ChatMessage::new(Sender::Buddy, text))
    }

    fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buddy::get_seed_buddies;

    fn token() -> SessionToken {
        SessionToken {
            buddy_id: "1".to_string(),
            generation: 1,
        }
    }

    #[test]
    fn test_greeting_uses_welcome_message() {
        let alex = get_seed_buddies().remove(0);
        assert_eq!(
            greeting(&alex),
            "Hi there! I'm Alex Assistant, your AI buddy. Hi there! I'm Alex, your friendly AI assistant. How can I help you today?"
        );
    }

    #[test]
    fn test_greeting_falls_back() {
        let mut alex = get_seed_buddies().remove(0);
        alex.welcome_message = None;
        assert!(greeting(&alex).ends_with("your AI buddy. How can I help you today?"));
    }

    #[test]
    fn test_log_typing_flag() {
        let alex = get_seed_buddies().remove(0);
        let mut log = ChatLog::start(token(), &alex);
        assert_eq!(log.messages().len(), 1);
        assert_eq!(log.messages()[0].sender, Sender::Buddy);
        assert!(!log.is_typing());

        log.push_user("hello");
        assert!(log.is_typing());
        log.push_reply("hi");
        assert!(!log.is_typing());

        let senders: Vec<Sender> = log.messages().iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::Buddy, Sender::User, Sender::Buddy]);
    }
}
