// Softbreak Harness Library
// Demo page, scripted sessions, and the settings file store

pub mod harness;
pub mod script;
pub mod settings;

pub use harness::ComposerPage;
pub use script::{parse, Session, Step, StepReport};
pub use settings::{default_settings_content, Settings, SettingsError};
