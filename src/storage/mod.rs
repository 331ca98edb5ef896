//! Local model storage
//!
//! Discovery of downloaded model files on disk.

pub mod hub;

pub use hub::{find_model_path, HubError};
