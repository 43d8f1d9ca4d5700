//! Buddy creation and update request models.

use serde::{Deserialize, Serialize};

use super::model::{Buddy, BuddySettings, Personality};
use super::preset::{default_description, welcome_message};
use crate::error::ValidationError;

/// Raw fields submitted by the create form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBuddyRequest {
    /// Display name (required)
    pub name: String,

    /// Description; blank means the generated default
    #[serde(default)]
    pub description: String,

    /// Personality value as submitted (required, case-insensitive)
    pub personality: String,

    /// Avatar URL; blank means none
    #[serde(default)]
    pub image_url: String,
}

/// Normalized fields produced by a successful [`CreateBuddyRequest::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBuddy {
    pub name: String,
    pub description: String,
    pub personality: Personality,
    pub image: Option<String>,
    pub welcome_message: String,
}

impl CreateBuddyRequest {
    /// Convenience constructor for the two required fields.
    pub fn new(name: impl Into<String>, personality: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            personality: personality.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the avatar URL.
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Validates the form and returns normalized fields.
    ///
    /// Pure: no side effects, no id or timestamp assignment.
    pub fn validate(&self) -> Result<ValidatedBuddy, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }

        let personality =
            Personality::parse(&self.personality).ok_or(ValidationError::MissingPersonality)?;

        let description = if self.description.trim().is_empty() {
            default_description(&self.name)
        } else {
            self.description.clone()
        };

        let image = Some(self.image_url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        Ok(ValidatedBuddy {
            name: self.name.clone(),
            description,
            personality,
            image,
            welcome_message: welcome_message(personality).to_string(),
        })
    }
}

/// Fields exposed by the settings form.
///
/// Applying it replaces the editable fields of an existing buddy and keeps
/// `id`, `created_at` and `welcome_message` untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBuddyRequest {
    pub name: String,
    pub description: String,
    pub personality: Personality,
    /// Avatar URL; blank clears it
    #[serde(default)]
    pub image_url: String,
    pub memory: bool,
    /// Slider value, 0-100
    pub creativity_percent: u8,
}

impl UpdateBuddyRequest {
    /// Pre-fills the form from an existing buddy.
    pub fn from_buddy(buddy: &Buddy) -> Self {
        let settings = buddy.effective_settings();
        Self {
            name: buddy.name.clone(),
            description: buddy.description.clone(),
            personality: buddy.personality,
            image_url: buddy.image.clone().unwrap_or_default(),
            memory: settings.memory,
            creativity_percent: settings.creativity_percent(),
        }
    }

    /// Validates the form and produces the replacement record.
    pub fn apply_to(&self, buddy: &Buddy) -> Result<Buddy, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.creativity_percent > 100 {
            return Err(ValidationError::CreativityOutOfRange(self.creativity_percent));
        }

        let image = Some(self.image_url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        Ok(Buddy {
            name: self.name.clone(),
            description: self.description.clone(),
            personality: self.personality,
            image,
            settings: Some(BuddySettings::from_percent(
                self.memory,
                self.creativity_percent,
            )),
            ..buddy.clone()
        })
    }
}
