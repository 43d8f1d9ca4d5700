pub mod config_service;
pub mod dto;
pub mod image_file;
pub mod key_value_buddy_repository;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::image_file::{read_image, write_image};
pub use crate::key_value_buddy_repository::{KeyValueBuddyRepository, STORAGE_KEY};
pub use crate::paths::BuddyPaths;
pub use crate::storage::{FileKeyValueStore, InMemoryKeyValueStore, open_store};
