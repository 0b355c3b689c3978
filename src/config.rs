use serde::Deserialize;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// File name looked up in the working directory by the command line tool.
pub const CONFIG_FILE_NAME: &str = "styled-text.toml";

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub html: HtmlConfig,
    pub links: LinksConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HtmlConfig {
    pub root_class: String,
    pub semantic_tags: bool,
    pub newlines: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            root_class: "styled-text".to_string(),
            semantic_tags: false,
            newlines: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LinksConfig {
    pub target: Option<String>,
    pub nofollow: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            target: None,
            nofollow: true,
        }
    }
}

impl Config {
    /// The defaults shipped in `default_config.toml`.
    pub fn compiled_default() -> Self {
        // build.rs rejects a malformed default file
        Self::from_toml_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Parse a TOML document. Missing keys take their default values.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load config from a TOML file, or return defaults if not found or invalid.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(config) => {
                    log::debug!("loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("ignoring invalid config {}: {}", path.display(), e);
                    Self::compiled_default()
                }
            },
            Err(_) => Self::compiled_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiled_default_matches_default() {
        assert_eq!(Config::compiled_default(), Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::from_toml_str("[links]\ntarget = \"_blank\"\n").unwrap();
        assert_eq!(config.links.target.as_deref(), Some("_blank"));
        assert!(config.links.nofollow);
        assert_eq!(config.html, HtmlConfig::default());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(Config::from_toml_str("[html\nroot_class = 1").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = Config::load(Path::new("does/not/exist.toml"));
        assert_eq!(config, Config::default());
    }
}
