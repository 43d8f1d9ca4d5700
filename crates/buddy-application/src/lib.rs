//! Application layer for Buddy Builder.
//!
//! This crate provides the use cases that coordinate the domain and
//! infrastructure layers: the top-level `BuddyApp` controller and the image
//! style workflow.

pub mod buddy_app;
pub mod image_transform_usecase;
pub mod style_transform_service;

pub use buddy_app::{BuddyApp, SendOutcome};
pub use buddy_core::style::MAX_UPLOAD_BYTES;
pub use image_transform_usecase::ImageTransformUseCase;
pub use style_transform_service::CanvasStyleTransform;
