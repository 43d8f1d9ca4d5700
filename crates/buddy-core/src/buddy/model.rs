//! Buddy domain model.
//!
//! Represents locally managed AI buddies the user can chat with.
//! Each buddy has a personality label that selects its greeting and reply style.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Default value of [`BuddySettings::memory`].
pub const DEFAULT_MEMORY: bool = true;

/// Default value of [`BuddySettings::creativity`].
pub const DEFAULT_CREATIVITY: f64 = 0.7;

/// The closed set of personalities a buddy can have.
///
/// Stored with the capitalised label; parsing is case-insensitive so the
/// lowercase values submitted by the create form resolve to the same variant.
#[derive(
    Deserialize,
    Serialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Personality {
    /// Warm, supportive, and positive
    Friendly,
    /// Formal, precise, and informative
    Professional,
    /// Imaginative, artistic, and inspirational
    Creative,
    /// Humorous, clever, with a touch of sarcasm
    Witty,
}

impl Personality {
    /// Parses a form value, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse().ok()
    }

    /// Short description shown next to the label in pickers.
    pub fn blurb(&self) -> &'static str {
        match self {
            Personality::Friendly => "Warm, supportive, and positive",
            Personality::Professional => "Formal, precise, and informative",
            Personality::Creative => "Imaginative, artistic, and inspirational",
            Personality::Witty => "Humorous, clever, with a touch of sarcasm",
        }
    }
}

/// Per-buddy tuning knobs edited from the settings form.
///
/// Nothing reads these to alter chat behaviour yet; they are kept as
/// inert configuration.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct BuddySettings {
    /// Whether the buddy should remember previous conversations
    pub memory: bool,
    /// Creativity level in `[0, 1]`
    pub creativity: f64,
}

impl Default for BuddySettings {
    fn default() -> Self {
        Self {
            memory: DEFAULT_MEMORY,
            creativity: DEFAULT_CREATIVITY,
        }
    }
}

impl BuddySettings {
    /// Builds settings from the 0-100 slider value used by the settings form.
    pub fn from_percent(memory: bool, creativity_percent: u8) -> Self {
        Self {
            memory,
            creativity: f64::from(creativity_percent) / 100.0,
        }
    }

    /// Creativity as the 0-100 slider value.
    pub fn creativity_percent(&self) -> u8 {
        (self.creativity * 100.0).round().clamp(0.0, 100.0) as u8
    }

    /// Returns true when `creativity` lies in `[0, 1]`.
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.creativity)
    }
}

/// An AI buddy.
///
/// `id` and `created_at` are assigned once at creation and never change.
/// Updates replace the whole record by `id`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Buddy {
    /// Unique identifier, opaque to callers
    pub id: String,
    /// Display name, never empty for a persisted buddy
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Personality label selecting greeting and reply style
    pub personality: Personality,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Avatar URL; `None` means the initials avatar is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// First message shown in a fresh chat session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    /// Tuning knobs; `None` means defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<BuddySettings>,
}

impl Buddy {
    /// Settings with defaults filled in when none were saved.
    pub fn effective_settings(&self) -> BuddySettings {
        self.settings.unwrap_or_default()
    }

    /// Initials shown when no avatar image is set.
    pub fn initials(&self) -> String {
        initials(&self.name)
    }
}

/// First letter of each space-separated word, uppercased, at most two characters.
pub fn initials(name: &str) -> String {
    name.split(' ')
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}
