//! sglchat
//!
//! Launch a local SGLang inference server for a supported model and chat
//! with it from the terminal.

pub mod chat;
pub mod client;
pub mod harmony;
pub mod server;
pub mod storage;
pub mod system;
pub mod types;
