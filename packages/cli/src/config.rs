use anyhow::Context;
use markup_common::FileSystem;
use markup_redline::RedlineConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "markup.config.json";

/// Markup configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Author attributed to tracked changes
    #[serde(default = "default_author")]
    pub author: String,

    /// Base name of the redlined output files
    #[serde(default = "default_output")]
    pub output: String,

    /// Engine thresholds and matching strategy
    #[serde(default)]
    pub redline: RedlineConfig,
}

fn default_author() -> String {
    markup_document::DEFAULT_AUTHOR.to_string()
}

fn default_output() -> String {
    "redline_agreement".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(fs: &dyn FileSystem, cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if fs.exists(&config_path) {
            let content = fs.read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid config {}", config_path.display()))?;
            tracing::debug!("Loaded {}", config_path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            author: default_author(),
            output: default_output(),
            redline: RedlineConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markup_common::{MockFileSystem, RealFileSystem};
    use markup_redline::MatchStrategy;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "author": "Counsel",
            "redline": { "paragraphMatchThreshold": 0.5, "matchStrategy": "optimal" }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.author, "Counsel");
        assert_eq!(config.output, "redline_agreement");
        assert_eq!(config.redline.paragraph_match_threshold, 0.5);
        assert_eq!(config.redline.match_strategy, MatchStrategy::Optimal);
        assert_eq!(config.redline.line_match_threshold, 0.4);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.author, "HK");
        assert_eq!(config.output, "redline_agreement");
        assert_eq!(config.redline.paragraph_match_threshold, 0.35);
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        assert_eq!(Config::load(&RealFileSystem, &cwd).unwrap().author, "HK");

        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{ "output": "marked_up" }"#).unwrap();
        let config = Config::load(&RealFileSystem, &cwd).unwrap();
        assert_eq!(config.output, "marked_up");
        assert_eq!(config.author, "HK");
    }

    #[test]
    fn test_load_through_file_system() {
        let fs = MockFileSystem::new();
        fs.add_file(
            PathBuf::from("/deal").join(DEFAULT_CONFIG_NAME),
            r#"{ "author": "Counsel", "redline": { "matchStrategy": "optimal" } }"#,
        );

        let config = Config::load(&fs, "/deal").unwrap();
        assert_eq!(config.author, "Counsel");
        assert_eq!(config.redline.match_strategy, MatchStrategy::Optimal);
        assert_eq!(Config::load(&fs, "/elsewhere").unwrap().author, "HK");

        fs.add_file(PathBuf::from("/broken").join(DEFAULT_CONFIG_NAME), "{ not json");
        assert!(Config::load(&fs, "/broken").is_err());
    }
}
