//! subleqd.toml configuration parser.
//!
//! ```toml
//! [server]
//! port = 6443
//!
//! [[pods]]
//! namespace = "default"
//! name = "hi-0"
//! labels = { name = "9x-1x3x10x-1x6x0x0x-1x72x105x0" }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use subleq_provider::PodRecord;

/// Port used when neither the CLI nor the config file sets one.
pub const DEFAULT_PORT: u16 = 6443;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdapterConfig {
    pub server: Option<ServerConfig>,
    #[serde(default)]
    pub pods: Vec<PodRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: Option<u16>,
}

impl AdapterConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AdapterConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the listen port: CLI flag, then config file, then default.
    pub fn port(&self, cli_port: Option<u16>) -> u16 {
        cli_port
            .or_else(|| self.server.as_ref().and_then(|s| s.port))
            .unwrap_or(DEFAULT_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_minimal() {
        let config: AdapterConfig = toml::from_str("").unwrap();
        assert!(config.server.is_none());
        assert!(config.pods.is_empty());
        assert_eq!(config.port(None), DEFAULT_PORT);
    }

    #[test]
    fn test_parse_pods() {
        let toml_str = r#"
[server]
port = 8443

[[pods]]
namespace = "prod"
name = "hi-0"
labels = { name = "9x-1x3x10x-1x6x0x0x-1x72x105x0", tier = "front" }

[[pods]]
name = "web-0"
"#;
        let config: AdapterConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.port(None), 8443);
        assert_eq!(config.pods.len(), 2);
        assert_eq!(config.pods[0].namespace, "prod");
        assert_eq!(config.pods[0].labels.get("tier").map(String::as_str), Some("front"));
        assert_eq!(config.pods[1].namespace, "default");
        assert!(config.pods[1].labels.is_empty());
    }

    #[test]
    fn cli_port_overrides_file() {
        let config: AdapterConfig = toml::from_str("[server]\nport = 8443\n").unwrap();
        assert_eq!(config.port(Some(9000)), 9000);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[pods]]\nname = \"a-0\"\nlabels = {{ name = \"a\" }}").unwrap();

        let config = AdapterConfig::from_file(file.path()).unwrap();
        assert_eq!(config.pods.len(), 1);
        assert_eq!(config.pods[0].name, "a-0");
    }

    #[test]
    fn shipped_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../deploy/subleqd.toml");
        let config = AdapterConfig::from_file(&path).unwrap();
        assert_eq!(config.port(None), 6443);
        assert_eq!(config.pods.len(), 3);
        assert!(config.pods.iter().all(|p| p.labels.contains_key("name")));
    }

    #[test]
    fn test_from_missing_file() {
        assert!(AdapterConfig::from_file(Path::new("/nonexistent/subleqd.toml")).is_err());
    }
}
