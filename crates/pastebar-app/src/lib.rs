//! Application layer logic for PasteBar.
//!
//! This crate provides the settings model and its TOML file, the shared settings
//! store, clipboard capture rules, and the data folder workflow used by the CLI.

pub mod auto_clear;
pub mod capture;
pub mod config;
pub mod db_location;
pub mod language;
pub mod settings;
pub mod store;
pub mod text;

// Re-exports for convenience
pub use auto_clear::{AutoClearError, AutoClearSchedule, DurationType};
pub use capture::{
    CaptureDecision, CapturePolicy, ClipboardMonitor, ClipboardPayload, HistoryInsertCounter,
    LanguageDetectOptions, MonitorEvent, SkipReason, mask_words,
};
pub use config::SettingsConfig;
pub use db_location::{DataLocationError, DataLocationManager, DbOperation, Dialog, PathStatus};
pub use language::{LanguageToggle, MAX_ENABLED_LANGUAGES, SUPPORTED_LANGUAGES};
pub use settings::{Settings, SettingsError};
pub use store::SettingsStore;
