//! Engine configuration.
//!
//! Where faction data and saves live, how strictly handles are checked, and
//! the standing policy. Loaded from and saved to a TOML file.

use allegiance_gameplay::policy::StandingPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "allegiance.toml";

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Data ===
    /// Directory holding faction definition files
    pub faction_data_path: PathBuf,
    /// Directory holding standing saves
    pub save_dir: PathBuf,
    /// Save slot restored at startup and written at shutdown
    pub save_slot: String,

    // === Debug ===
    /// Treat invalid faction handles as fatal (debug builds only)
    pub strict_handles: bool,

    // === Standing ===
    /// Standing range, propagation and labels
    pub standing: StandingPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            faction_data_path: PathBuf::from(crate::faction_loader::DEFAULT_FACTION_PATH),
            save_dir: default_save_dir(),
            save_slot: "current".to_string(),
            strict_handles: cfg!(debug_assertions),
            standing: StandingPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if the file is missing, unreadable or invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        let config: Self = match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                return Self::default();
            },
        };

        if let Err(e) = config.standing.validate() {
            warn!("Invalid standing policy in config, using defaults: {e}");
            return Self {
                standing: StandingPolicy::default(),
                ..config
            };
        }

        info!("Loaded config from {}", path.display());
        config
    }

    /// Save configuration to the default file location.
    pub fn save(&self) -> io::Result<()> {
        self.save_to(Self::config_path())
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    ///
    /// `ALLEGIANCE_CONFIG` overrides the platform config directory.
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os("ALLEGIANCE_CONFIG") {
            return PathBuf::from(path);
        }
        match dirs::config_dir() {
            Some(config_dir) => config_dir.join("allegiance").join(CONFIG_FILE),
            None => PathBuf::from(CONFIG_FILE),
        }
    }
}

fn default_save_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(data_dir) => data_dir.join("allegiance").join("saves"),
        None => PathBuf::from(crate::save_manager::DEFAULT_SAVE_DIR),
    }
}
