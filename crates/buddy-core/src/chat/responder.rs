//! Reply generation seam.
//!
//! There is no language model behind this; replies come from fixed
//! per-personality templates that echo part of the user's input.

use crate::buddy::Personality;

/// Reply used for personality values outside the known set.
pub const FALLBACK_REPLY: &str = "I understand. Let me help you with that.";

/// Produces a buddy's reply to one user utterance.
pub trait ChatResponder: Send + Sync {
    fn generate_reply(&self, personality: Personality, user_text: &str) -> String;
}

/// Template-based responder.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateResponder;

impl ChatResponder for TemplateResponder {
    fn generate_reply(&self, personality: Personality, user_text: &str) -> String {
        reply_for_tag(personality.as_ref(), user_text)
    }
}

/// Reply for a raw personality tag, matched case-insensitively.
pub fn reply_for_tag(tag: &str, user_text: &str) -> String {
    let length = user_text.chars().count();
    match tag.to_lowercase().as_str() {
        "friendly" => format!(
            "I'd be happy to help with that! {}",
            if length > 20 {
                "Thanks for sharing your thoughts."
            } else {
                ""
            }
        ),
        "professional" => format!(
            "I understand your request. Let me provide a detailed response regarding \"{}...\".",
            first_words(user_text, 3)
        ),
        "creative" => format!(
            "Oh, that's an interesting thought! I have some creative ideas about \"{}...\"",
            first_words(user_text, 3)
        ),
        "witty" => format!(
            "Well, well, well... {} Let me think about that...",
            if length > 15 {
                "That's quite the statement!"
            } else {
                "Interesting point!"
            }
        ),
        _ => FALLBACK_REPLY.to_string(),
    }
}

fn first_words(text: &str, count: usize) -> String {
    text.split(' ').take(count).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friendly_length_bucket() {
        let responder = TemplateResponder;
        assert_eq!(
            responder.generate_reply(Personality::Friendly, "hi"),
            "I'd be happy to help with that! "
        );
        assert_eq!(
            responder.generate_reply(Personality::Friendly, "this is a rather long message"),
            "I'd be happy to help with that! Thanks for sharing your thoughts."
        );
    }

    #[test]
    fn test_professional_and_creative_quote_first_three_words() {
        let responder = TemplateResponder;
        assert_eq!(
            responder.generate_reply(Personality::Professional, "explain the tax code please"),
            "I understand your request. Let me provide a detailed response regarding \"explain the tax...\"."
        );
        assert_eq!(
            responder.generate_reply(Personality::Creative, "paint me"),
            "Oh, that's an interesting thought! I have some creative ideas about \"paint me...\""
        );
    }

    #[test]
    fn test_witty_length_bucket() {
        let responder = TemplateResponder;
        assert_eq!(
            responder.generate_reply(Personality::Witty, "short one"),
            "Well, well, well... Interesting point! Let me think about that..."
        );
        assert_eq!(
            responder.generate_reply(Personality::Witty, "a considerably longer one"),
            "Well, well, well... That's quite the statement! Let me think about that..."
        );
    }

    #[test]
    fn test_tag_matching_is_case_insensitive_with_fallback() {
        assert_eq!(
            reply_for_tag("WITTY", "x"),
            "Well, well, well... Interesting point! Let me think about that..."
        );
        assert_eq!(reply_for_tag("stoic", "x"), FALLBACK_REPLY);
    }
}
