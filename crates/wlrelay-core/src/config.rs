use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::session::SessionIdentifierScheme;

/// Timeouts for host-side transfer attempts (optional `[delivery]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 2,
            timeout_secs: 5,
        }
    }
}

impl DeliveryConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Global configuration loaded from `~/.config/wlrelay/config.toml`.
///
/// The extension and the host application must read the same identifier
/// fields, otherwise the host never sees the extension's transfers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WlrelayConfig {
    /// Shared prefix of background session identifiers.
    pub session_identifier_prefix: String,
    /// Name of the sending extension; last label of its session identifier.
    pub extension_name: String,
    /// Spool directory standing in for the OS transfer subsystem.
    /// Defaults to `~/.local/state/wlrelay/spool`.
    #[serde(default)]
    pub spool_dir: Option<PathBuf>,
    /// Optional host-side delivery timeouts; built-in defaults when missing.
    #[serde(default)]
    pub delivery: Option<DeliveryConfig>,
}

impl Default for WlrelayConfig {
    fn default() -> Self {
        Self {
            session_identifier_prefix: "org.adblockplus.BackgroundNotificationSession".to_string(),
            extension_name: "safari-action-extension".to_string(),
            spool_dir: None,
            delivery: None,
        }
    }
}

impl WlrelayConfig {
    /// The identifier convention both sides of the protocol derive from.
    pub fn identifier_scheme(&self) -> SessionIdentifierScheme {
        SessionIdentifierScheme::new(&self.session_identifier_prefix)
    }

    /// Session identifier of the configured extension.
    pub fn session_identifier(&self) -> String {
        self.identifier_scheme().derive(&self.extension_name)
    }

    /// Reject identifier fields the host could not recognize again: an
    /// empty prefix, or an extension name that is not a single label.
    pub fn validate(&self) -> Result<()> {
        if self.session_identifier_prefix.trim_end_matches('.').is_empty() {
            bail!("session_identifier_prefix must not be empty");
        }
        if !self.identifier_scheme().owns(&self.session_identifier()) {
            bail!(
                "extension_name {:?} must be a non-empty name without '.'",
                self.extension_name
            );
        }
        Ok(())
    }

    pub fn delivery(&self) -> DeliveryConfig {
        self.delivery.clone().unwrap_or_default()
    }

    /// Configured spool directory, or the XDG state default.
    pub fn spool_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.spool_dir {
            return Ok(dir.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix("wlrelay")?;
        Ok(xdg_dirs.get_state_home().join("spool"))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("wlrelay")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WlrelayConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] against an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<WlrelayConfig> {
    if !path.exists() {
        let default_cfg = WlrelayConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: WlrelayConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = WlrelayConfig::default();
        assert_eq!(
            cfg.session_identifier_prefix,
            "org.adblockplus.BackgroundNotificationSession"
        );
        assert_eq!(cfg.extension_name, "safari-action-extension");
        assert!(cfg.spool_dir.is_none());
        assert_eq!(cfg.delivery().timeout_secs, 5);
    }

    #[test]
    fn session_identifier_is_deterministic() {
        let a = WlrelayConfig::default();
        let b = WlrelayConfig::default();
        assert_eq!(a.session_identifier(), b.session_identifier());
        assert_eq!(
            a.session_identifier(),
            "org.adblockplus.BackgroundNotificationSession.safari-action-extension"
        );
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            session_identifier_prefix = "com.example.Signals"
            extension_name = "share"
            spool_dir = "/tmp/wlrelay-spool"

            [delivery]
            connect_timeout_secs = 1
            timeout_secs = 3
        "#;
        let cfg: WlrelayConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.session_identifier(), "com.example.Signals.share");
        assert_eq!(cfg.spool_dir().unwrap(), PathBuf::from("/tmp/wlrelay-spool"));
        let delivery = cfg.delivery();
        assert_eq!(delivery.connect_timeout(), Duration::from_secs(1));
        assert_eq!(delivery.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn load_or_init_writes_defaults_then_reads_them_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let created = load_or_init_at(&path).unwrap();
        assert!(path.exists());

        let loaded = load_or_init_at(&path).unwrap();
        assert_eq!(loaded.session_identifier(), created.session_identifier());
    }

    #[test]
    fn extension_name_must_be_a_single_label() {
        assert!(WlrelayConfig::default().validate().is_ok());
        for name in ["", "safari.action", "."] {
            let cfg = WlrelayConfig {
                extension_name: name.to_string(),
                ..WlrelayConfig::default()
            };
            assert!(cfg.validate().is_err(), "extension_name {name:?}");
        }
        let cfg = WlrelayConfig {
            session_identifier_prefix: ".".to_string(),
            ..WlrelayConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_rejects_dotted_extension_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "session_identifier_prefix = \"com.example.Signals\"\nextension_name = \"a.b\"\n",
        )
        .unwrap();
        let err = load_or_init_at(&path).unwrap_err();
        assert!(format!("{err:#}").contains("extension_name"), "{err:#}");
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "extension_name = 42").unwrap();
        assert!(load_or_init_at(&path).is_err());
    }
}
