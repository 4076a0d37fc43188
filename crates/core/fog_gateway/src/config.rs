use camino::Utf8Path;
use camino::Utf8PathBuf;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::net::IpAddr;
use std::net::Ipv4Addr;
use std::net::SocketAddr;

pub const DEFAULT_CONFIG_DIR: &str = "/etc/fog-gateway";
pub const CONFIG_FILE: &str = "fog-gateway.toml";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Toml syntax error in the config file '{path}': {reason}")]
    InvalidSyntax { path: Utf8PathBuf, reason: String },

    #[error("Failed to read the config file '{path}': {source}")]
    Read { path: Utf8PathBuf, source: io::Error },

    #[error("Invalid HTTP path: {path:?}, it must start with '/'")]
    InvalidHttpPath { path: String },

    #[error("Invalid log level: {name:?}, supported levels are trace, debug, info, warn and error")]
    InvalidLogLevel { name: String },
}

/// The content of `fog-gateway.toml`
///
/// ```toml
/// [http]
/// bind_address = "0.0.0.0"
/// port = 8000
/// path = "/uplink"
///
/// [log]
/// fog-gateway = "debug"
/// ```
#[derive(Deserialize, Debug, Default, Eq, PartialEq)]
pub struct GatewayConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub log: HashMap<String, String>,
}

#[derive(Deserialize, Debug, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub bind_address: IpAddr,
    pub port: u16,
    /// Route of the uplink translation endpoint
    pub path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            path: "/uplink".to_string(),
        }
    }
}

impl HttpConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

impl GatewayConfig {
    /// Read the configuration from the given directory, using the defaults if there is no config file
    pub fn try_new(config_dir: &Utf8Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        let config: GatewayConfig = match fs::read_to_string(&config_path) {
            Ok(contents) => {
                toml::from_str(&contents).map_err(|e| ConfigError::InvalidSyntax {
                    path: config_path,
                    reason: e.to_string(),
                })?
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => GatewayConfig::default(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: config_path,
                    source,
                })
            }
        };

        if !config.http.path.starts_with('/') {
            return Err(ConfigError::InvalidHttpPath {
                path: config.http.path,
            });
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn deserialize_gateway_config() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [http]
            bind_address = "127.0.0.1"
            port = 8080
            path = "/api/uplink"

            [log]
            fog-gateway = "debug"
        "#,
        )
        .unwrap();

        assert_eq!(
            config.http.socket_addr(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.http.path, "/api/uplink");
        assert_eq!(config.log.get("fog-gateway").map(String::as_str), Some("debug"));
    }

    #[test]
    fn missing_http_settings_use_defaults() {
        let config: GatewayConfig = toml::from_str("[http]\nport = 9000\n").unwrap();
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.path, "/uplink");
        assert_eq!(config.http.bind_address, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }

    #[test]
    fn missing_config_file_uses_defaults() -> anyhow::Result<()> {
        let (_dir, config_dir) = create_temp_config_dir(None)?;
        let config = GatewayConfig::try_new(&config_dir)?;
        assert_eq!(config, GatewayConfig::default());
        Ok(())
    }

    #[test]
    fn invalid_syntax_is_reported() -> anyhow::Result<()> {
        let (_dir, config_dir) = create_temp_config_dir(Some("[http\nport = 1"))?;
        let err = GatewayConfig::try_new(&config_dir).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSyntax { .. }), "{err}");
        Ok(())
    }

    #[test]
    fn unknown_http_settings_are_rejected() -> anyhow::Result<()> {
        let (_dir, config_dir) = create_temp_config_dir(Some("[http]\nhost = \"localhost\"\n"))?;
        let err = GatewayConfig::try_new(&config_dir).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSyntax { .. }), "{err}");
        Ok(())
    }

    #[test]
    fn relative_http_path_is_rejected() -> anyhow::Result<()> {
        let (_dir, config_dir) = create_temp_config_dir(Some("[http]\npath = \"uplink\"\n"))?;
        let err = GatewayConfig::try_new(&config_dir).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid HTTP path: \"uplink\", it must start with '/'"
        );
        Ok(())
    }

    // Need to return TempDir, otherwise the dir will be deleted when this function ends.
    fn create_temp_config_dir(content: Option<&str>) -> io::Result<(TempDir, Utf8PathBuf)> {
        let temp_dir = TempDir::new()?;
        let config_root = temp_dir.path().to_path_buf();
        if let Some(content) = content {
            fs::write(config_root.join(CONFIG_FILE), content.as_bytes())?;
        }
        Ok((temp_dir, config_root.try_into().unwrap()))
    }
}
