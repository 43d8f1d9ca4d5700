//! Seed buddies and fixed text tables.
//!
//! The seed set is what a fresh (or unreadable) store starts from.

use chrono::Utc;

use super::model::{Buddy, Personality};

/// Welcome message used when the personality value is not a known label.
pub const FALLBACK_WELCOME_MESSAGE: &str = "How can I help you today?";

/// Builds the description used when the create form leaves it blank.
pub fn default_description(name: &str) -> String {
    format!("{} is your personal AI assistant.", name)
}

/// Welcome message for a raw personality value from the create form.
///
/// Matching ignores case; anything outside the four known labels gets the
/// generic fallback.
pub fn welcome_message_for(personality: &str) -> &'static str {
    match Personality::parse(personality) {
        Some(p) => welcome_message(p),
        None => FALLBACK_WELCOME_MESSAGE,
    }
}

/// Welcome message for a known personality.
pub fn welcome_message(personality: Personality) -> &'static str {
    match personality {
        Personality::Friendly => "I'm so excited to chat with you! How are you feeling today?",
        Personality::Professional => {
            "I'm here to assist you with any tasks or questions you may have."
        }
        Personality::Creative => "Let's explore some exciting ideas together! What's on your mind?",
        Personality::Witty => {
            "Well hello there! Ready for a conversation that's marginally more interesting than watching paint dry?"
        }
    }
}

/// Returns the three example buddies a new store is seeded with.
///
/// - **Alex Assistant** (`"1"`): Friendly everyday helper
/// - **Prof. Logic** (`"2"`): Professional, precise facts
/// - **Iris Imagine** (`"3"`): Creative brainstorming companion
pub fn get_seed_buddies() -> Vec<Buddy> {
    let now = Utc::now();
    vec![
        Buddy {
            id: "1".to_string(),
            name: "Alex Assistant".to_string(),
            description: "A helpful and friendly assistant for everyday tasks and questions."
                .to_string(),
            personality: Personality::Friendly,
            created_at: now,
            image: None,
            welcome_message: Some(
                "Hi there! I'm Alex, your friendly AI assistant. How can I help you today?"
                    .to_string(),
            ),
            settings: None,
        },
        Buddy {
            id: "2".to_string(),
            name: "Prof. Logic".to_string(),
            description:
                "A professional and precise AI that provides detailed factual information."
                    .to_string(),
            personality: Personality::Professional,
            created_at: now,
            image: None,
            welcome_message: Some(
                "Greetings. I'm Professor Logic, ready to provide you with accurate information and analysis."
                    .to_string(),
            ),
            settings: None,
        },
        Buddy {
            id: "3".to_string(),
            name: "Iris Imagine".to_string(),
            description: "A creative companion for brainstorming ideas and artistic endeavors."
                .to_string(),
            personality: Personality::Creative,
            created_at: now,
            image: None,
            welcome_message: Some(
                "Hello creative soul! I'm Iris, and I'm excited to explore imaginative ideas with you!"
                    .to_string(),
            ),
            settings: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_ids_and_personalities() {
        let seeds = get_seed_buddies();
        let ids: Vec<&str> = seeds.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(seeds[0].personality, Personality::Friendly);
        assert_eq!(seeds[1].personality, Personality::Professional);
        assert_eq!(seeds[2].personality, Personality::Creative);
        assert!(seeds.iter().all(|b| b.welcome_message.is_some()));
    }

    #[test]
    fn test_welcome_message_lookup() {
        assert_eq!(
            welcome_message_for("witty"),
            "Well hello there! Ready for a conversation that's marginally more interesting than watching paint dry?"
        );
        assert_eq!(welcome_message_for("FRIENDLY"), welcome_message(Personality::Friendly));
        assert_eq!(welcome_message_for("sleepy"), FALLBACK_WELCOME_MESSAGE);
    }

    #[test]
    fn test_default_description() {
        assert_eq!(default_description("Zed"), "Zed is your personal AI assistant.");
    }
}
