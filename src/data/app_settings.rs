use crate::data::energy_entry::EnergyLevel;
use crate::data::persistence::Persistable;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do when the entries file exists but cannot be parsed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CorruptDataPolicy {
    /// Move the unreadable file aside and start with an empty store.
    #[default]
    Reset,
    /// Abort startup with the parse error.
    Fail,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub default_level: u8,
    pub on_corrupt_data: CorruptDataPolicy,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            default_level: EnergyLevel::DEFAULT.get(),
            on_corrupt_data: CorruptDataPolicy::default(),
        }
    }
}

/// Wrapper for the `settings` key of config.yaml.
#[derive(Serialize, Deserialize, Default, Debug)]
struct SettingsWrapper {
    #[serde(default)]
    settings: AppSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
    fn is_json() -> bool {
        false
    }
}

impl AppSettings {
    pub fn load_from(dir: &Path) -> Result<Self> {
        Ok(SettingsWrapper::load_from(dir)?.settings)
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        let wrapper = SettingsWrapper {
            settings: self.clone(),
        };
        wrapper.save_to(dir)
    }

    pub fn config_path(dir: &Path) -> std::path::PathBuf {
        SettingsWrapper::path_in(dir)
    }

    /// The draft level after a reset, clamped into range.
    pub fn default_level(&self) -> EnergyLevel {
        EnergyLevel::clamped(i32::from(self.default_level))
    }
}
