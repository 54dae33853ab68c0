//! Configuration management for dial-emu.
//!
//! Configuration is loaded from multiple sources in priority order:
//! 1. Environment variables (DIAL_EMU_*)
//! 2. Project-local config file (`./dial-emu.toml`)
//! 3. User config file (`~/.config/dial-emu/config.toml`)
//! 4. Built-in defaults
//!
//! # Config File Format
//!
//! ```toml
//! # dial-emu.toml
//!
//! # Idle cycles between instructions under the conservative policy
//! conservative_idle_cycles = 1040
//!
//! # Zero-crossing accumulator behavior past its field width
//! overflow = "wrap"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::device::OverflowPolicy;
use crate::driver::timing;

/// Global cached configuration.
static CONFIG: OnceLock<Config> = OnceLock::new();

/// dial-emu configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Idle cycles between instructions under the conservative policy.
    /// Must cover the largest magnitude the step-count lines carry.
    pub conservative_idle_cycles: Option<u64>,

    /// Extra cycles past the driven count under the tight policy.
    pub tight_idle_margin: Option<u64>,

    /// Half period of the synthesized clock, in microseconds.
    pub clock_half_period_us: Option<u64>,

    /// Zero-crossing accumulator behavior past its 11-bit field.
    pub overflow: Option<OverflowPolicy>,
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Project-local `dial-emu.toml`
    /// 3. User config `~/.config/dial-emu/config.toml`
    /// 4. Defaults
    pub fn load() -> Self {
        let mut config = Self::default();

        // Load user config first (lowest priority of file configs)
        if let Some(user_config) = Self::load_user_config() {
            config.merge(user_config);
        }

        // Load project-local config (higher priority)
        if let Some(local_config) = Self::load_local_config() {
            config.merge(local_config);
        }

        // Environment variables override everything
        config.apply_env_overrides();

        config
    }

    /// Get the cached global configuration.
    ///
    /// Loads configuration on first call and caches it.
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(|| {
            let config = Self::load();
            log::debug!("Loaded configuration: {:?}", config);
            config
        })
    }

    /// Conservative idle bound, with fallback to the built-in default.
    pub fn conservative_idle_cycles(&self) -> u64 {
        self.conservative_idle_cycles
            .unwrap_or(timing::CONSERVATIVE_IDLE_CYCLES)
    }

    /// Tight-policy margin, with fallback to the built-in default.
    pub fn tight_idle_margin(&self) -> u64 {
        self.tight_idle_margin.unwrap_or(timing::TIGHT_IDLE_MARGIN)
    }

    /// Clock half period in microseconds, with fallback to the default.
    pub fn clock_half_period_us(&self) -> u64 {
        self.clock_half_period_us
            .unwrap_or(timing::CLOCK_HALF_PERIOD_US)
    }

    /// Accumulator overflow policy, with fallback to the default (wrap).
    pub fn overflow(&self) -> OverflowPolicy {
        self.overflow.unwrap_or_default()
    }

    /// Load user configuration from ~/.config/dial-emu/config.toml
    fn load_user_config() -> Option<Self> {
        let config_dir = dirs::config_dir()?;
        let config_path = config_dir.join("dial-emu").join("config.toml");
        Self::load_from_file(&config_path)
    }

    /// Load project-local configuration from ./dial-emu.toml
    fn load_local_config() -> Option<Self> {
        // Try current directory
        let local_path = Path::new("dial-emu.toml");
        if let Some(config) = Self::load_from_file(local_path) {
            return Some(config);
        }

        // Try to find project root by looking for Cargo.toml
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let project_path = Path::new(&manifest_dir).join("dial-emu.toml");
            if let Some(config) = Self::load_from_file(&project_path) {
                return Some(config);
            }
        }

        None
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Merge another config into this one.
    /// Only overrides fields that are Some in the other config.
    fn merge(&mut self, other: Self) {
        if other.conservative_idle_cycles.is_some() {
            self.conservative_idle_cycles = other.conservative_idle_cycles;
        }
        if other.tight_idle_margin.is_some() {
            self.tight_idle_margin = other.tight_idle_margin;
        }
        if other.clock_half_period_us.is_some() {
            self.clock_half_period_us = other.clock_half_period_us;
        }
        if other.overflow.is_some() {
            self.overflow = other.overflow;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_u64("DIAL_EMU_CONSERVATIVE_IDLE_CYCLES") {
            self.conservative_idle_cycles = Some(v);
        }
        if let Some(v) = env_u64("DIAL_EMU_TIGHT_IDLE_MARGIN") {
            self.tight_idle_margin = Some(v);
        }
        if let Some(v) = env_u64("DIAL_EMU_CLOCK_HALF_PERIOD_US") {
            self.clock_half_period_us = Some(v);
        }
        if let Ok(value) = std::env::var("DIAL_EMU_OVERFLOW") {
            match value.to_ascii_lowercase().as_str() {
                "wrap" => self.overflow = Some(OverflowPolicy::Wrap),
                "saturate" => self.overflow = Some(OverflowPolicy::Saturate),
                _ => log::warn!("Ignoring unknown DIAL_EMU_OVERFLOW value: {:?}", value),
            }
        }
    }

    /// Get the path to the user config file (for display/creation).
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dial-emu").join("config.toml"))
    }

    /// Generate a sample config file content.
    pub fn sample_config() -> String {
        r#"# dial-emu configuration
# Place this file at ~/.config/dial-emu/config.toml or ./dial-emu.toml

# Idle cycles between instructions under the conservative policy.
# Must cover the largest magnitude the step-count lines carry (1023).
# conservative_idle_cycles = 1040

# Extra cycles past the driven count under the tight policy.
# tight_idle_margin = 2

# Half period of the synthesized clock, in microseconds.
# clock_half_period_us = 50

# Zero-crossing accumulator behavior past its 11-bit field:
# "wrap" (the hardware arithmetic) or "saturate".
# overflow = "wrap"
"#
        .to_string()
    }
}

/// Read a u64 from the environment, logging what happened.
fn env_u64(name: &str) -> Option<u64> {
    let value = std::env::var(name).ok()?;
    match value.parse() {
        Ok(v) => {
            log::info!("Using {} from environment: {}", name, v);
            Some(v)
        }
        Err(_) => {
            log::warn!("Ignoring unparseable {}: {:?}", name, value);
            None
        }
    }
}
