//! Configuration for the fusis API process
//!
//! Layers, lowest priority first:
//! - built-in defaults (`0.0.0.0:8000`, `development`)
//! - optional TOML file (`fusis.toml` or an explicit path)
//! - environment variables `HOST`, `PORT`, `FUSIS_ENV`
//!
//! CLI flags are merged on top by the binary.

use crate::common::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ENV: &str = "development";

/// File looked up in the working directory when no explicit path is given
const DEFAULT_CONFIG_FILE: &str = "fusis";

/// Environment variable → config key
const ENV_OVERRIDES: &[(&str, &str)] = &[("HOST", "host"), ("PORT", "port"), ("FUSIS_ENV", "env")];

/// API process configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Listening host
    pub host: String,

    /// Listening port
    pub port: u16,

    /// Deployment environment tag (informational only)
    pub env: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            env: DEFAULT_ENV.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::load_with_vars(path, &vars)
    }

    /// Load configuration with an explicit variable map instead of the process environment.
    pub fn load_with_vars(path: Option<&Path>, vars: &HashMap<String, String>) -> Result<Self> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let mut builder = config::Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("env", DEFAULT_ENV)?
            .add_source(file);

        for (var, key) in ENV_OVERRIDES {
            // An empty variable counts as unset
            let value = vars.get(*var).filter(|v| !v.is_empty()).cloned();
            builder = builder.set_override_option(*key, value)?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// `host:port` as handed to the listener
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(crate::Error::InvalidConfig("host must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let file = write_toml("");
        let config = Config::load_with_vars(Some(file.path()), &HashMap::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_env_overrides_independently() {
        let file = write_toml("");
        let config =
            Config::load_with_vars(Some(file.path()), &vars(&[("PORT", "9000")])).unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, 9000);

        let config =
            Config::load_with_vars(Some(file.path()), &vars(&[("HOST", "127.0.0.1")])).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_empty_env_is_ignored() {
        let file = write_toml("");
        let config = Config::load_with_vars(
            Some(file.path()),
            &vars(&[("HOST", ""), ("PORT", ""), ("FUSIS_ENV", "")]),
        )
        .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_beats_file() {
        let file = write_toml("host = \"10.0.0.1\"\nport = 7000\nenv = \"staging\"\n");
        let config = Config::load_with_vars(Some(file.path()), &HashMap::new()).unwrap();
        assert_eq!(config.host, "10.0.0.1");
        assert_eq!(config.port, 7000);
        assert_eq!(config.env, "staging");

        let config = Config::load_with_vars(
            Some(file.path()),
            &vars(&[("PORT", "7100"), ("FUSIS_ENV", "production")]),
        )
        .unwrap();
        assert_eq!(config.host, "10.0.0.1");
        assert_eq!(config.port, 7100);
        assert_eq!(config.env, "production");
    }

    #[test]
    fn test_invalid_port() {
        let file = write_toml("");
        let err = Config::load_with_vars(Some(file.path()), &vars(&[("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, crate::Error::InvalidConfig(_)));
    }

    #[test]
    fn test_ipv6_address() {
        let config = Config {
            host: "::1".into(),
            ..Default::default()
        };
        assert_eq!(config.address(), "[::1]:8000");
    }
}
