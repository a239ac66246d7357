//! Optional runtime configuration, read from `config.json` in the working
//! directory. A missing or malformed file falls back to defaults.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Shaderlab".to_string(),
            width: 1240,
            height: 910,
            vsync: true,
        }
    }
}

impl Config {
    /// Loads the config file, falling back to defaults with a warning when the
    /// file is missing or does not parse.
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("ignoring malformed {path}: {e}");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_1240_by_910() {
        let config = Config::default();
        assert_eq!(config.window.width, 1240);
        assert_eq!(config.window.height, 910);
    }

    #[test]
    fn partial_json_keeps_defaults_for_the_rest() {
        let config: Config = serde_json::from_str(r#"{"window": {"width": 800}}"#).unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 910);
        assert_eq!(config.window.title, "Shaderlab");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        assert_eq!(
            Config::load("definitely-not-a-config-file.json"),
            Config::default()
        );
    }
}
