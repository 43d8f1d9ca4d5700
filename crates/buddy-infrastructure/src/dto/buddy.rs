//! Buddy DTOs and migrations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use buddy_core::buddy::{Buddy, BuddySettings, Personality};

/// Stored personality label.
///
/// Deserialization is exact: only the four capitalised labels are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonalityDTO {
    Friendly,
    Professional,
    Creative,
    Witty,
}

impl From<PersonalityDTO> for Personality {
    fn from(dto: PersonalityDTO) -> Self {
        match dto {
            PersonalityDTO::Friendly => Personality::Friendly,
            PersonalityDTO::Professional => Personality::Professional,
            PersonalityDTO::Creative => Personality::Creative,
            PersonalityDTO::Witty => Personality::Witty,
        }
    }
}

impl From<Personality> for PersonalityDTO {
    fn from(personality: Personality) -> Self {
        match personality {
            Personality::Friendly => PersonalityDTO::Friendly,
            Personality::Professional => PersonalityDTO::Professional,
            Personality::Creative => PersonalityDTO::Creative,
            Personality::Witty => PersonalityDTO::Witty,
        }
    }
}

/// Stored behaviour settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuddySettingsDTO {
    pub memory: bool,
    pub creativity: f64,
}

impl From<BuddySettingsDTO> for BuddySettings {
    fn from(dto: BuddySettingsDTO) -> Self {
        BuddySettings {
            memory: dto.memory,
            creativity: dto.creativity,
        }
    }
}

impl From<BuddySettings> for BuddySettingsDTO {
    fn from(settings: BuddySettings) -> Self {
        BuddySettingsDTO {
            memory: settings.memory,
            creativity: settings.creativity,
        }
    }
}

/// Buddy record DTO V1.0.0
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct BuddyV1_0_0 {
    pub id: String,
    pub name: String,
    pub description: String,
    pub personality: PersonalityDTO,
    /// RFC 3339 timestamp
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<BuddySettingsDTO>,
}

/// Convert BuddyV1_0_0 DTO to domain model
impl IntoDomain<Buddy> for BuddyV1_0_0 {
    fn into_domain(self) -> Buddy {
        Buddy {
            id: self.id,
            name: self.name,
            description: self.description,
            personality: self.personality.into(),
            created_at: self.created_at,
            image: self.image,
            welcome_message: self.welcome_message,
            settings: self.settings.map(Into::into),
        }
    }
}

/// Convert domain model to BuddyV1_0_0 DTO for persistence
impl From<&Buddy> for BuddyV1_0_0 {
    fn from(buddy: &Buddy) -> Self {
        BuddyV1_0_0 {
            id: buddy.id.clone(),
            name: buddy.name.clone(),
            description: buddy.description.clone(),
            personality: buddy.personality.into(),
            created_at: buddy.created_at,
            image: buddy.image.clone(),
            welcome_message: buddy.welcome_message.clone(),
            settings: buddy.settings.map(Into::into),
        }
    }
}

/// Convert domain model to BuddyV1_0_0 DTO (for version-migrate save support)
impl FromDomain<Buddy> for BuddyV1_0_0 {
    fn from_domain(buddy: Buddy) -> Self {
        BuddyV1_0_0::from(&buddy)
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates a Migrator for Buddy entities.
pub fn create_buddy_migrator() -> version_migrate::Migrator {
    version_migrate::migrator!("buddy" => [BuddyV1_0_0, Buddy], save = true)
        .expect("Failed to create buddy migrator")
}
