use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "secrets.toml";

/// Language used for month names in dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthsLanguage {
    #[default]
    En,
    Es,
}

impl MonthsLanguage {
    /// Name of `month` (1-12)
    pub fn month_name(&self, month: u32) -> &'static str {
        const EN: [&str; 12] = [
            "January", "February", "March", "April", "May", "June", "July", "August", "September",
            "October", "November", "December",
        ];
        const ES: [&str; 12] = [
            "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
            "octubre", "noviembre", "diciembre",
        ];
        let names = match self {
            MonthsLanguage::En => &EN,
            MonthsLanguage::Es => &ES,
        };
        names[(month.clamp(1, 12) - 1) as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub author: String,
    pub data_dir: PathBuf,
    pub months_language: MonthsLanguage,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            author: "Anonymous".to_string(),
            data_dir: PathBuf::from("./data/"),
            months_language: MonthsLanguage::En,
        }
    }
}

impl Config {
    /// Reads the config at `path`, writing the defaults there first if it is missing
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            fs::write(path, toml::to_string_pretty(&config)?)?;
            log::info!("Created default config at {}", path.display());
            return Ok(config);
        }

        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
