//! Configuration for the deeper-mcp server.
//!
//! Layered with figment: built-in defaults, then a TOML file, then
//! `DEEPER_*` environment variables. The result is translated into the
//! `DeviceClient` and login defaults the tool dispatcher runs with.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use deeper_api::{DeviceClient, PasswordEncryptor, TransportConfig};
use deeper_core::LoginDefaults;

/// Environment variable that overrides the configured device password.
pub const PASSWORD_ENV: &str = "DEEPER_PASSWORD";

const ENV_PREFIX: &str = "DEEPER_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("cannot build device client: {0}")]
    Client(#[from] deeper_api::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceSettings,
}

/// The `[device]` table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceSettings {
    /// Device base URL or bare host.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_username")]
    pub username: String,

    /// Login password (plaintext; prefer `DEEPER_PASSWORD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Overall request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// PEM file with the device's login public key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_path: Option<PathBuf>,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            username: default_username(),
            password: None,
            timeout_secs: default_timeout(),
            public_key_path: None,
        }
    }
}

fn default_base_url() -> String {
    format!("http://{}", deeper_api::DEFAULT_HOST)
}
fn default_username() -> String {
    "admin".into()
}
fn default_timeout() -> u64 {
    30
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("network", "deeper", "deeper-mcp").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("deeper-mcp");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// The provider stack: defaults, then `path` (or the platform config
/// file), then `DEEPER_*` variables with `__` separating nested keys,
/// e.g. `DEEPER_DEVICE__BASE_URL`.
pub fn figment(path: Option<&Path>) -> Figment {
    let file = path.map_or_else(config_path, Path::to_path_buf);
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(file))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load and validate the configuration.
///
/// A missing platform config file is fine; an explicitly named one that
/// does not exist is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(p) = path {
        if !p.exists() {
            return Err(ConfigError::NotFound { path: p.to_path_buf() });
        }
    }
    let config: Config = figment(path).extract()?;
    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.device.base_url()?;
        if self.device.timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "device.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// The effective configuration as TOML, with the password masked.
    pub fn render(&self) -> Result<String, ConfigError> {
        let mut shown = self.clone();
        if shown.device.password.is_some() {
            shown.device.password = Some("<redacted>".into());
        }
        Ok(toml::to_string_pretty(&shown)?)
    }

    /// Build the device client this configuration describes.
    pub fn device_client(&self) -> Result<DeviceClient, ConfigError> {
        let client = DeviceClient::new(self.device.base_url()?, &self.device.transport())?;
        Ok(client.with_encryptor(self.device.encryptor()?))
    }

    /// Credentials the login tool falls back to.
    pub fn login_defaults(&self) -> LoginDefaults {
        LoginDefaults {
            username: self.device.username.clone(),
            password: resolve_password(&self.device),
        }
    }
}

impl DeviceSettings {
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        DeviceClient::parse_base_url(&self.base_url).map_err(|e| ConfigError::Validation {
            field: "device.base_url".into(),
            reason: e.to_string(),
        })
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default().with_timeout(Duration::from_secs(self.timeout_secs))
    }

    /// The configured public key, or the built-in one.
    pub fn encryptor(&self) -> Result<PasswordEncryptor, ConfigError> {
        let Some(ref path) = self.public_key_path else {
            return Ok(PasswordEncryptor::default());
        };
        let pem = std::fs::read_to_string(path)?;
        PasswordEncryptor::from_pem(&pem).map_err(|e| ConfigError::Validation {
            field: "device.public_key_path".into(),
            reason: format!("{}: {e}", path.display()),
        })
    }
}

// ── Credential resolution ───────────────────────────────────────────

/// `DEEPER_PASSWORD` if set and non-empty, else the configured password.
pub fn resolve_password(device: &DeviceSettings) -> Option<SecretString> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Some(SecretString::from(pw));
        }
    }
    device.password.clone().map(SecretString::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn defaults_fill_missing_keys() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[device]\nusername = \"root\"\n")?;
            let cfg = load_config(Some(Path::new("config.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(cfg.device.username, "root");
            assert_eq!(cfg.device.base_url, "http://34.34.34.34");
            assert_eq!(cfg.device.timeout_secs, 30);
            assert!(cfg.device.password.is_none());
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                "[device]\nbase_url = \"192.168.1.1\"\ntimeout_secs = 5\n",
            )?;
            jail.set_env("DEEPER_DEVICE__BASE_URL", "http://10.0.0.1:8080");
            let cfg = load_config(Some(Path::new("config.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(cfg.device.base_url, "http://10.0.0.1:8080");
            assert_eq!(cfg.device.timeout_secs, 5);
            Ok(())
        });
    }

    #[test]
    fn password_env_wins_over_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[device]\npassword = \"from-file\"\n")?;
            let cfg = load_config(Some(Path::new("config.toml"))).map_err(|e| e.to_string())?;
            let pw = cfg.login_defaults().password.unwrap();
            assert_eq!(pw.expose_secret(), "from-file");

            jail.set_env(PASSWORD_ENV, "from-env");
            let pw = cfg.login_defaults().password.unwrap();
            assert_eq!(pw.expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        Jail::expect_with(|_jail| {
            let err = load_config(Some(Path::new("nope.toml"))).unwrap_err();
            assert!(matches!(err, ConfigError::NotFound { .. }));
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[device]\ntimeout_secs = 0\n")?;
            let err = load_config(Some(Path::new("config.toml"))).unwrap_err();
            assert!(
                matches!(err, ConfigError::Validation { ref field, .. } if field == "device.timeout_secs")
            );

            jail.create_file("bad-url.toml", "[device]\nbase_url = \"http://\"\n")?;
            let err = load_config(Some(Path::new("bad-url.toml"))).unwrap_err();
            assert!(
                matches!(err, ConfigError::Validation { ref field, .. } if field == "device.base_url")
            );
            Ok(())
        });
    }

    #[test]
    fn render_masks_password() {
        let mut cfg = Config::default();
        cfg.device.password = Some("hunter2".into());
        let rendered = cfg.render().unwrap();
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn public_key_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(deeper_api::crypto::DEFAULT_PUBLIC_KEY_PEM.as_bytes())
            .unwrap();

        let device = DeviceSettings {
            public_key_path: Some(file.path().to_path_buf()),
            ..DeviceSettings::default()
        };
        let ciphertext = device.encryptor().unwrap().encrypt("pw").unwrap();
        assert_eq!(ciphertext.len(), 172);
    }

    #[test]
    fn bad_public_key_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not a key").unwrap();

        let device = DeviceSettings {
            public_key_path: Some(file.path().to_path_buf()),
            ..DeviceSettings::default()
        };
        assert!(matches!(
            device.encryptor(),
            Err(ConfigError::Validation { .. })
        ));
    }
}
