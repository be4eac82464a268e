pub mod directories;
pub mod settings;

pub use settings::{Settings, SettingsError, SettingsProvider};
