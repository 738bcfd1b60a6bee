use serde::{Deserialize, Serialize};

/// How paragraphs inside a replace block are paired with revised lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Each original paragraph in turn takes its best unused line
    #[default]
    Greedy,
    /// Global assignment maximizing total similarity
    Optimal,
}

/// Tuning knobs of the redlining engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedlineConfig {
    /// A paragraph and a revised line are paired only above this similarity
    #[serde(default = "default_paragraph_threshold")]
    pub paragraph_match_threshold: f64,

    /// Same rule for the plain line-vs-line redline
    #[serde(default = "default_line_threshold")]
    pub line_match_threshold: f64,

    /// Fuzzy lookup in the name index accepts only scores above this
    #[serde(default = "default_fuzzy_threshold")]
    pub anchor_fuzzy_threshold: f64,

    /// Keys must be longer than this for substring lookup
    #[serde(default = "default_substring_min_len")]
    pub substring_min_len: usize,

    #[serde(default)]
    pub match_strategy: MatchStrategy,

    /// Characters kept in the preview of a failed edit
    #[serde(default = "default_preview_len")]
    pub preview_len: usize,
}

fn default_paragraph_threshold() -> f64 {
    0.35
}

fn default_line_threshold() -> f64 {
    0.4
}

fn default_fuzzy_threshold() -> f64 {
    0.7
}

fn default_substring_min_len() -> usize {
    10
}

fn default_preview_len() -> usize {
    60
}

impl Default for RedlineConfig {
    fn default() -> Self {
        Self {
            paragraph_match_threshold: default_paragraph_threshold(),
            line_match_threshold: default_line_threshold(),
            anchor_fuzzy_threshold: default_fuzzy_threshold(),
            substring_min_len: default_substring_min_len(),
            match_strategy: MatchStrategy::default(),
            preview_len: default_preview_len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let json = r#"{ "paragraphMatchThreshold": 0.5, "matchStrategy": "optimal" }"#;
        let config: RedlineConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.paragraph_match_threshold, 0.5);
        assert_eq!(config.match_strategy, MatchStrategy::Optimal);
        assert_eq!(config.line_match_threshold, 0.4);
        assert_eq!(config.anchor_fuzzy_threshold, 0.7);
        assert_eq!(config.substring_min_len, 10);
        assert_eq!(config.preview_len, 60);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config: RedlineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RedlineConfig::default());
        assert_eq!(config.match_strategy, MatchStrategy::Greedy);
    }
}
