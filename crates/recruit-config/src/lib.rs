//! recruit-config
//!
//! Persistent user preferences: export naming, storage keys, assistant
//! bindings and output settings, plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{AccessibilitySettings, Config};
