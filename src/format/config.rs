//! Formatting configuration

use serde::{Deserialize, Serialize};

/// Class list put on every linked mention (h-card microformat)
pub const DEFAULT_MENTION_CLASS: &str = "h-card u-url mention";

/// Knobs for `TextFormatter`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Turn bare URLs into links
    pub linkify: bool,
    /// Remote lookups allowed in flight at once; 1 is fully sequential
    pub lookup_concurrency: usize,
    /// `class` attribute of linked mentions
    pub mention_class: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            linkify: true,
            lookup_concurrency: 1,
            mention_class: DEFAULT_MENTION_CLASS.to_string(),
        }
    }
}

impl FormatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_linkify(mut self, linkify: bool) -> Self {
        self.linkify = linkify;
        self
    }

    /// Values below 1 are treated as 1.
    pub fn with_lookup_concurrency(mut self, concurrency: usize) -> Self {
        self.lookup_concurrency = concurrency.max(1);
        self
    }

    pub fn with_mention_class(mut self, class: impl Into<String>) -> Self {
        self.mention_class = class.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: FormatConfig = serde_json::from_str(r#"{"linkify": false}"#).unwrap();
        assert!(!config.linkify);
        assert_eq!(config.lookup_concurrency, 1);
        assert_eq!(config.mention_class, DEFAULT_MENTION_CLASS);
    }

    #[test]
    fn concurrency_floor_is_one() {
        assert_eq!(FormatConfig::new().with_lookup_concurrency(0).lookup_concurrency, 1);
    }
}
