use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, warn};

/// Endpoint used when neither the command line nor the config names one
pub const DEFAULT_RPC_URL: &str = "https://mainnet.infura.io/v3/YOUR_INFURA_PROJECT_ID";

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub name: String,
    pub rpc: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Default RPC endpoint
    #[serde(default)]
    pub rpc: Option<String>,

    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
}

impl Config {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolve the endpoint to dial.
    ///
    /// An explicit value wins over the config default, which wins over the
    /// placeholder. Either may name a configured endpoint alias.
    pub fn resolve_rpc(&self, requested: Option<&str>) -> String {
        let chosen = requested
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or(self.rpc.as_deref())
            .unwrap_or(DEFAULT_RPC_URL);

        self.endpoint_by_name(chosen)
            .map(|endpoint| endpoint.rpc.clone())
            .unwrap_or_else(|| chosen.to_string())
    }

    fn endpoint_by_name(&self, name: &str) -> Option<&EndpointConfig> {
        self.endpoints.iter().find(|endpoint| endpoint.name == name)
    }
}

/// Load the config file, falling back to defaults when it is missing or invalid
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    match Config::parse(&content) {
        Ok(config) => {
            debug!(path = %path.display(), "loaded config");
            config
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring invalid config file");
            Config::default()
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("VIEWCALL_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("viewcall").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("viewcall").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "viewcall", "viewcall")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
rpc = "local"

[[endpoints]]
name = "local"
rpc = "http://localhost:8545"

[[endpoints]]
name = "mainnet"
rpc = "https://eth.llamarpc.com"
"#;

    #[test]
    fn test_parse_config() {
        let config = Config::parse(SAMPLE).unwrap();
        assert_eq!(config.rpc.as_deref(), Some("local"));
        assert_eq!(config.endpoints.len(), 2);
    }

    #[test]
    fn test_resolve_rpc_precedence() {
        let config = Config::parse(SAMPLE).unwrap();
        assert_eq!(config.resolve_rpc(None), "http://localhost:8545");
        assert_eq!(config.resolve_rpc(Some("mainnet")), "https://eth.llamarpc.com");
        assert_eq!(
            config.resolve_rpc(Some("http://10.0.0.2:8545")),
            "http://10.0.0.2:8545"
        );
        assert_eq!(config.resolve_rpc(Some("  ")), "http://localhost:8545");
    }

    #[test]
    fn test_default_config_uses_placeholder() {
        assert_eq!(Config::default().resolve_rpc(None), DEFAULT_RPC_URL);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(Config::parse("rpc = [").is_err());
        assert!(Config::parse("").unwrap().rpc.is_none());
    }
}
