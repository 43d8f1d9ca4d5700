//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema of the stored buddy collection.
//! They are private to the infrastructure layer and handle the evolution
//! of the storage format over time.
//!
//! ## Schema Versioning (Semantic Versioning)
//!
//! - **MAJOR (X.0.0)**: Breaking changes (field removal, type changes)
//! - **MINOR (1.X.0)**: Backward-compatible additions (new optional fields)
//!
//! ### Buddy Version History
//! - **1.0.0**: Initial schema (camelCase keys, optional image, welcome
//!   message and settings)

mod buddy;

pub use buddy::{BuddySettingsDTO, BuddyV1_0_0, PersonalityDTO, create_buddy_migrator};
