use crate::data::persistence::Persistable;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// How many months the picker exposes, starting at the current month.
    pub months_shown: u32,
    /// Months rendered side by side in the TUI.
    pub months_per_row: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            months_shown: 12,
            months_per_row: 3,
        }
    }
}

/// Wrapper that reads the `settings` key from config.yaml, so the file can
/// carry other sections later — serde ignores unknown fields by default.
#[derive(Serialize, Deserialize, Default, Debug)]
struct SettingsFile {
    #[serde(default)]
    settings: Settings,
}

impl Persistable for SettingsFile {
    fn filename() -> &'static str {
        "config.yaml"
    }
    fn is_json() -> bool {
        false
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Ok(SettingsFile::load()?.settings)
    }

    pub fn load_from(dir: &Path) -> Result<Self> {
        Ok(SettingsFile::load_from(dir)?.settings)
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        SettingsFile {
            settings: self.clone(),
        }
        .save_to(dir)
    }
}
