//! Global configuration loaded from `~/.config/vdm/config.toml`.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::dom::WaitPolicy;
use crate::monitor::DEFAULT_TEMP_SUFFIX;
use crate::portal;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VdmConfig {
    /// Download portal landing page.
    pub portal_url: String,
    /// WebDriver endpoint the CLI connects to.
    pub webdriver_url: String,
    /// Per-wait timeout in seconds (the `-t` flag overrides this).
    pub wait_timeout_secs: f64,
    /// Poll interval for bounded waits, in milliseconds.
    pub poll_interval_ms: u64,
    /// Interval between download progress reports, in seconds.
    pub monitor_interval_secs: u64,
    /// Interim-file suffix of the browser's download agent.
    pub temp_suffix: String,
}

impl Default for VdmConfig {
    fn default() -> Self {
        Self {
            portal_url: portal::DEFAULT_PORTAL_URL.to_string(),
            webdriver_url: "http://localhost:9515".to_string(),
            wait_timeout_secs: 20.0,
            poll_interval_ms: 500,
            monitor_interval_secs: 1,
            temp_suffix: DEFAULT_TEMP_SUFFIX.to_string(),
        }
    }
}

impl VdmConfig {
    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy {
            timeout: Duration::from_secs_f64(self.wait_timeout_secs),
            interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    pub fn monitor_interval(&self) -> Duration {
        Duration::from_secs(self.monitor_interval_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vdm")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<VdmConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = VdmConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: VdmConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = VdmConfig::default();
        assert_eq!(cfg.wait_timeout_secs, 20.0);
        assert_eq!(cfg.poll_interval_ms, 500);
        assert_eq!(cfg.monitor_interval_secs, 1);
        assert_eq!(cfg.temp_suffix, ".crdownload");
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = VdmConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: VdmConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.portal_url, cfg.portal_url);
        assert_eq!(parsed.wait_timeout_secs, cfg.wait_timeout_secs);
        assert_eq!(parsed.temp_suffix, cfg.temp_suffix);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let cfg: VdmConfig = toml::from_str("wait_timeout_secs = 5.0\n").unwrap();
        assert_eq!(cfg.wait_timeout_secs, 5.0);
        assert_eq!(cfg.poll_interval_ms, 500);
        assert_eq!(cfg.portal_url, portal::DEFAULT_PORTAL_URL);
    }

    #[test]
    fn wait_policy_from_config() {
        let mut cfg = VdmConfig::default();
        cfg.wait_timeout_secs = 2.5;
        cfg.poll_interval_ms = 100;
        let policy = cfg.wait_policy();
        assert_eq!(policy.timeout, Duration::from_millis(2500));
        assert_eq!(policy.interval, Duration::from_millis(100));
    }
}
