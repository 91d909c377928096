//! Faction definition loading.
//!
//! This module provides:
//! - Loading faction definitions from assets/factions/*.toml
//! - Deterministic ordering (files sorted by name, factions in file order)
//! - Hot-reload detection for development

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use ahash::AHashMap;
use allegiance_common::SchemaVersion;
use allegiance_gameplay::faction::{FactionDefinition, FactionError};
use allegiance_gameplay::logo::LogoStore;
use allegiance_gameplay::policy::StandingPolicy;
use allegiance_gameplay::session::FactionSession;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

/// Default asset path for faction definitions.
pub const DEFAULT_FACTION_PATH: &str = "assets/factions";

/// Errors that can occur during faction loading.
#[derive(Debug, Error)]
pub enum FactionLoadError {
    /// Faction directory not found.
    #[error("Faction directory not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read file.
    #[error("Failed to read faction file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("Failed to parse faction TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// File written for an incompatible format version.
    #[error("Unsupported faction file version: {0}")]
    UnsupportedVersion(String),

    /// One file in the directory failed; nothing from the directory is used.
    #[error("Faction file {path:?}: {source}")]
    File {
        /// File that failed.
        path: PathBuf,
        /// What went wrong with it.
        source: Box<FactionLoadError>,
    },

    /// Definitions rejected by the registry.
    #[error("Invalid faction definitions: {0}")]
    Definition(#[from] FactionError),
}

/// Result type for faction loading operations.
pub type FactionLoadResult<T> = Result<T, FactionLoadError>;

/// A collection of factions from a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactionFile {
    /// File format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Factions in this file.
    #[serde(default)]
    pub factions: Vec<FactionDefinition>,
}

fn default_version() -> String {
    SchemaVersion::FACTION_DEFS.to_string()
}

impl FactionFile {
    /// Parses a file body and checks its version.
    pub fn parse(content: &str) -> FactionLoadResult<Self> {
        let file: Self = toml::from_str(content)?;
        let version = SchemaVersion::parse(&file.version)
            .map_err(|_| FactionLoadError::UnsupportedVersion(file.version.clone()))?;
        if !SchemaVersion::FACTION_DEFS.can_read(&version) {
            return Err(FactionLoadError::UnsupportedVersion(file.version));
        }
        Ok(file)
    }
}

/// Statistics for the faction loader.
#[derive(Debug, Default, Clone)]
pub struct FactionLoaderStats {
    /// Number of files loaded.
    pub files_loaded: u32,
    /// Number of factions loaded.
    pub factions_loaded: u32,
    /// Number of hot-reloads detected.
    pub hot_reloads: u32,
}

/// Reads faction definition files from a directory.
pub struct FactionLoader {
    /// Base path for faction files.
    base_path: PathBuf,
    /// Modification times for hot-reload detection.
    mod_times: AHashMap<PathBuf, SystemTime>,
    /// Whether hot-reload is enabled.
    hot_reload_enabled: bool,
    /// Statistics.
    stats: FactionLoaderStats,
}

impl FactionLoader {
    /// Creates a new faction loader.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        info!("Initializing faction loader at: {:?}", base_path);

        Self {
            base_path,
            mod_times: AHashMap::new(),
            hot_reload_enabled: cfg!(debug_assertions),
            stats: FactionLoaderStats::default(),
        }
    }

    /// Creates a loader with default path.
    #[must_use]
    pub fn with_default_path() -> Self {
        Self::new(DEFAULT_FACTION_PATH)
    }

    /// Enables or disables hot-reload.
    #[must_use]
    pub fn with_hot_reload(mut self, enabled: bool) -> Self {
        self.hot_reload_enabled = enabled;
        self
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns loader statistics.
    #[must_use]
    pub fn stats(&self) -> &FactionLoaderStats {
        &self.stats
    }

    /// Loads every definition under the base path.
    ///
    /// Files are read in sorted order so handles come out the same on every
    /// run. The first file that cannot be read or parsed fails the whole
    /// load, so callers never see a registry missing part of its data.
    pub fn load_all(&mut self) -> FactionLoadResult<Vec<FactionDefinition>> {
        if !self.base_path.is_dir() {
            return Err(FactionLoadError::NotFound(self.base_path.clone()));
        }

        self.stats.files_loaded = 0;
        self.stats.factions_loaded = 0;
        self.mod_times.clear();

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.base_path)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        let mut definitions = Vec::new();
        for path in paths {
            let mut factions = self.load_file(&path).map_err(|e| {
                error!("Failed to load faction file {:?}: {}", path, e);
                FactionLoadError::File {
                    path: path.clone(),
                    source: Box::new(e),
                }
            })?;
            definitions.append(&mut factions);
        }

        info!(
            "Loaded {} faction definitions from {} files",
            self.stats.factions_loaded, self.stats.files_loaded
        );
        Ok(definitions)
    }

    /// Loads definitions from a single file.
    pub fn load_file(&mut self, path: &Path) -> FactionLoadResult<Vec<FactionDefinition>> {
        debug!("Loading faction file: {:?}", path);

        let content = fs::read_to_string(path)?;
        let file = FactionFile::parse(&content)?;

        if let Ok(modified) = fs::metadata(path).and_then(|m| m.modified()) {
            self.mod_times.insert(path.to_path_buf(), modified);
        }

        let count = file.factions.len();
        self.stats.files_loaded += 1;
        self.stats.factions_loaded += u32::try_from(count).unwrap_or(u32::MAX);
        debug!("Loaded {} factions from {:?}", count, path);

        Ok(file.factions)
    }

    /// Loads every definition and builds a session from them.
    pub fn load_session(
        &mut self,
        logos: &mut dyn LogoStore,
        policy: StandingPolicy,
    ) -> FactionLoadResult<FactionSession> {
        let definitions = self.load_all()?;
        Ok(FactionSession::with_factions(&definitions, logos, policy)?)
    }

    /// Checks whether any loaded file changed on disk since it was read.
    ///
    /// Callers reload the session when this returns true.
    pub fn check_hot_reload(&mut self) -> bool {
        if !self.hot_reload_enabled {
            return false;
        }

        let changed = self.mod_times.iter().find(|(path, seen)| {
            fs::metadata(path)
                .and_then(|m| m.modified())
                .is_ok_and(|modified| modified > **seen)
        });

        match changed {
            Some((path, _)) => {
                info!("Faction file changed: {:?}", path);
                self.stats.hot_reloads += 1;
                true
            },
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allegiance_gameplay::logo::NullLogoStore;
    use tempfile::TempDir;

    const GREAT_HOUSES: &str = r#"
version = "1.0.0"

[[factions]]
name = "Empire"
long_name = "Galactic Empire"
logo = "gfx/logo/empire.png"
enemies = ["Pirates"]

[[factions]]
name = "Dvaered"
allies = ["Empire"]
"#;

    const OUTLAWS: &str = r#"
[[factions]]
name = "Pirates"
enemies = ["Dvaered"]
"#;

    fn data_dir() -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("10_great_houses.toml"), GREAT_HOUSES).expect("write");
        fs::write(dir.path().join("20_outlaws.toml"), OUTLAWS).expect("write");
        dir
    }

    #[test]
    fn test_parse_toml() {
        let file = FactionFile::parse(GREAT_HOUSES).expect("parse");
        assert_eq!(file.version, "1.0.0");
        assert_eq!(file.factions.len(), 2);

        let empire = &file.factions[0];
        assert_eq!(empire.name, "Empire");
        assert_eq!(empire.long_name.as_deref(), Some("Galactic Empire"));
        assert_eq!(empire.enemies, vec!["Pirates".to_string()]);
        assert!(empire.allies.is_empty());
    }

    #[test]
    fn test_missing_version_defaults() {
        let file = FactionFile::parse(OUTLAWS).expect("parse");
        assert_eq!(file.version, "1.0.0");
    }

    #[test]
    fn test_future_version_rejected() {
        let content = "version = \"2.0.0\"\n\n[[factions]]\nname = \"Empire\"\n";
        assert!(matches!(
            FactionFile::parse(content),
            Err(FactionLoadError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            FactionFile::parse("version = \"latest\"\n"),
            Err(FactionLoadError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_load_all_sorted() {
        let dir = data_dir();
        fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

        let mut loader = FactionLoader::new(dir.path());
        let defs = loader.load_all().expect("load");

        let names: Vec<_> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Empire", "Dvaered", "Pirates"]);
        assert_eq!(loader.stats().files_loaded, 2);
        assert_eq!(loader.stats().factions_loaded, 3);
    }

    #[test]
    fn test_malformed_file_fails_whole_load() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(
            dir.path().join("10_core.toml"),
            "[[factions]]\nname = \"Empire\"\n",
        )
        .expect("write");
        fs::write(
            dir.path().join("20_outlaws.toml"),
            "[[factions]]\nname = \"Pirates\"\nenemies = [\"Empire\"\n",
        )
        .expect("write");

        let mut loader = FactionLoader::new(dir.path());
        let result = loader.load_session(&mut NullLogoStore, StandingPolicy::default());
        match result {
            Err(FactionLoadError::File { path, source }) => {
                assert!(path.ends_with("20_outlaws.toml"));
                assert!(matches!(*source, FactionLoadError::Parse(_)));
            },
            other => panic!("expected the broken file to fail the load, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_version_fails_whole_load() {
        let dir = data_dir();
        fs::write(
            dir.path().join("30_future.toml"),
            "version = \"2.0.0\"\n\n[[factions]]\nname = \"Zalek\"\n",
        )
        .expect("write");

        let mut loader = FactionLoader::new(dir.path());
        assert!(matches!(
            loader.load_all(),
            Err(FactionLoadError::File { source, .. })
                if matches!(*source, FactionLoadError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_missing_directory() {
        let mut loader = FactionLoader::new("/nonexistent/factions");
        assert!(matches!(
            loader.load_all(),
            Err(FactionLoadError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_session() {
        let dir = data_dir();
        let mut loader = FactionLoader::new(dir.path());
        let session = loader
            .load_session(&mut NullLogoStore, StandingPolicy::default())
            .expect("load");

        let empire = session.faction_get("Empire").expect("known faction");
        let dvaered = session.faction_get("Dvaered").expect("known faction");
        let pirates = session.faction_get("Pirates").expect("known faction");
        assert!(session.are_allies(empire, dvaered));
        assert!(session.are_enemies(pirates, empire));
        assert!(session.are_enemies(dvaered, pirates));
    }

    #[test]
    fn test_load_session_dangling_reference() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("outlaws.toml"), OUTLAWS).expect("write");

        let mut loader = FactionLoader::new(dir.path());
        assert!(matches!(
            loader.load_session(&mut NullLogoStore, StandingPolicy::default()),
            Err(FactionLoadError::Definition(FactionError::Definition(_)))
        ));
    }

    #[test]
    fn test_bundled_factions_load() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/factions");
        let mut loader = FactionLoader::new(path);
        let session = loader
            .load_session(&mut NullLogoStore, StandingPolicy::default())
            .expect("bundled data is valid");

        assert_eq!(session.faction_count(), 5);
        let empire = session.faction_get("Empire").expect("known faction");
        let rebels = session.faction_get("Rebels").expect("known faction");
        assert!(session.are_enemies(rebels, empire));
    }

    #[test]
    fn test_hot_reload_disabled() {
        let dir = data_dir();
        let mut loader = FactionLoader::new(dir.path()).with_hot_reload(false);
        loader.load_all().expect("load");
        assert!(!loader.check_hot_reload());
    }

    #[test]
    fn test_hot_reload_unchanged() {
        let dir = data_dir();
        let mut loader = FactionLoader::new(dir.path()).with_hot_reload(true);
        loader.load_all().expect("load");
        assert!(!loader.check_hot_reload());
        assert_eq!(loader.stats().hot_reloads, 0);
    }
}
