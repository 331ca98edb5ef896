//! Shared type definitions
//!
//! This module contains the data types used across the application.

pub mod message;
pub mod model;

pub use message::{Message, Role};
pub use model::{find_preset, preset_names, ModelPreset};
