//! Tools configuration from TOML (`[tools]` section)
//!
//! ```toml
//! [tools]
//! knowledge_base = "./cloud-docs.json"   # JSON array of entries; built-in seed when unset
//! web_search = true                      # needs the `web-tools` feature
//! web_timeout_seconds = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Raw tools configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    pub knowledge_base: Option<PathBuf>,
    pub web_search: bool,
    pub web_timeout_seconds: u64,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            knowledge_base: None,
            web_search: true,
            web_timeout_seconds: 30,
        }
    }
}

impl FileToolsConfig {
    pub fn web_timeout(&self) -> Duration {
        Duration::from_secs(self.web_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tools_defaults() {
        let config = FileToolsConfig::default();
        assert!(config.web_search);
        assert!(config.knowledge_base.is_none());
        assert_eq!(config.web_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_tools_deserialize() {
        let toml_str = r#"
[tools]
knowledge_base = "docs.json"
web_search = false
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.tools.knowledge_base, Some(PathBuf::from("docs.json")));
        assert!(!config.tools.web_search);
        assert_eq!(config.tools.web_timeout_seconds, 30);
    }
}
