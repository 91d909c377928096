//! Standings report runner.
//!
//! Loads the configured faction data, restores the player's standings from
//! the configured save slot and prints one row per faction.

use std::fmt;

use allegiance_common::FactionId;
use allegiance_gameplay::faction::FactionResult;
use allegiance_gameplay::presentation::StandingTier;
use allegiance_gameplay::save::SaveError;
use allegiance_gameplay::session::FactionSession;
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::faction_loader::FactionLoader;
use crate::logo_cache::LogoCache;
use crate::save_manager::SaveManager;

/// One faction as shown in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// Display name
    pub long_name: String,
    /// Player standing
    pub standing: i32,
    /// Standing label
    pub label: String,
    /// Standing tier
    pub tier: StandingTier,
    /// Names of enemies
    pub enemies: Vec<String>,
    /// Names of allies
    pub allies: Vec<String>,
}

impl fmt::Display for ReportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<24} {:>4}  {:<10}",
            self.long_name, self.standing, self.label
        )?;
        if !self.allies.is_empty() {
            write!(f, "  allies: {}", self.allies.join(", "))?;
        }
        if !self.enemies.is_empty() {
            write!(f, "  enemies: {}", self.enemies.join(", "))?;
        }
        Ok(())
    }
}

/// Builds one report row per faction, in handle order.
pub fn report(session: &FactionSession) -> FactionResult<Vec<ReportRow>> {
    let names = |ids: &[FactionId]| -> FactionResult<Vec<String>> {
        ids.iter()
            .map(|&id| session.faction_name(id).map(str::to_string))
            .collect()
    };

    session
        .faction_ids()
        .into_iter()
        .map(|id| {
            let display = session.standing_display(id)?;
            Ok(ReportRow {
                long_name: session.faction_long_name(id)?.to_string(),
                standing: display.value,
                label: display.label.to_string(),
                tier: display.tier,
                enemies: names(session.enemies_of(id)?)?,
                allies: names(session.allies_of(id)?)?,
            })
        })
        .collect()
}

/// Restores standings from a slot if it exists.
///
/// Returns whether anything was restored.
pub fn restore_slot(session: &mut FactionSession, saves: &SaveManager, slot: &str) -> Result<bool> {
    match saves.load(slot) {
        Ok(save) => {
            session.restore(&save)?;
            Ok(true)
        },
        Err(SaveError::NotFound(_)) => {
            info!("No save in slot '{}', starting from default standings", slot);
            Ok(false)
        },
        Err(e) => Err(e).with_context(|| format!("failed to read save slot '{slot}'")),
    }
}

/// Runs the report against a configuration.
pub fn run(config: &EngineConfig) -> Result<()> {
    let mut logos = LogoCache::new();
    let mut loader = FactionLoader::new(&config.faction_data_path);
    let mut session = loader
        .load_session(&mut logos, config.standing.clone())
        .with_context(|| {
            format!(
                "failed to load factions from {}",
                config.faction_data_path.display()
            )
        })?
        .with_strict_handles(config.strict_handles);

    let saves = SaveManager::new(&config.save_dir);
    restore_slot(&mut session, &saves, &config.save_slot)?;

    let rows = report(&session)?;
    if rows.is_empty() {
        warn!("No factions defined in {}", config.faction_data_path.display());
    }
    for row in &rows {
        println!("{row}");
    }

    saves
        .save(&config.save_slot, &session.snapshot()?)
        .with_context(|| format!("failed to write save slot '{}'", config.save_slot))?;

    session.free(&mut logos);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use allegiance_gameplay::faction::FactionDefinition;
    use allegiance_gameplay::logo::NullLogoStore;
    use allegiance_gameplay::policy::StandingPolicy;
    use allegiance_gameplay::save::StandingsSave;
    use std::fs;
    use tempfile::TempDir;

    fn session() -> FactionSession {
        let defs = [
            FactionDefinition::new("Empire")
                .with_long_name("Galactic Empire")
                .with_enemy("Pirates"),
            FactionDefinition::new("Pirates"),
            FactionDefinition::new("Trader").with_ally("Empire"),
        ];
        FactionSession::with_factions(&defs, &mut NullLogoStore, StandingPolicy::default())
            .expect("valid definitions")
    }

    #[test]
    fn test_report_rows() {
        let mut session = session();
        let pirates = session.faction_get("Pirates").expect("known faction");
        session.mod_player_raw(pirates, -80).expect("valid handle");

        let rows = report(&session).expect("report");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].long_name, "Galactic Empire");
        assert_eq!(rows[0].enemies, vec!["Pirates"]);
        assert_eq!(rows[0].allies, vec!["Trader"]);
        assert_eq!(rows[1].standing, -80);
        assert_eq!(rows[1].label, "Enemy");
        assert_eq!(rows[1].tier, StandingTier::Hostile);

        let line = rows[0].to_string();
        assert!(line.starts_with("Galactic Empire"));
        assert!(line.contains("allies: Trader"));
    }

    #[test]
    fn test_restore_slot() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let saves = SaveManager::new(dir.path());
        let mut session = session();

        assert!(!restore_slot(&mut session, &saves, "career").expect("missing is fine"));

        let mut save = StandingsSave::new();
        save.set("Trader", 44);
        saves.save("career", &save).expect("save");
        assert!(restore_slot(&mut session, &saves, "career").expect("restore"));

        let trader = session.faction_get("Trader").expect("known faction");
        assert_eq!(session.player_standing(trader).expect("standing"), 44);

        fs::write(dir.path().join("broken.alst"), b"ALST\xff").expect("write");
        assert!(restore_slot(&mut session, &saves, "broken").is_err());
    }

    #[test]
    fn test_run_writes_save() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let data = dir.path().join("factions");
        fs::create_dir_all(&data).expect("mkdir");
        fs::write(
            data.join("core.toml"),
            concat!(
                "[[factions]]\nname = \"Empire\"\n\n",
                "[[factions]]\nname = \"Rebels\"\nenemies = [\"Empire\"]\n",
            ),
        )
        .expect("write");

        let config = EngineConfig {
            faction_data_path: data,
            save_dir: dir.path().join("saves"),
            save_slot: "current".to_string(),
            strict_handles: false,
            ..EngineConfig::default()
        };
        run(&config).expect("run");

        let save = SaveManager::new(&config.save_dir)
            .load("current")
            .expect("save written");
        assert_eq!(save.get("Empire"), Some(0));
        assert_eq!(save.get("Rebels"), Some(0));
    }

    #[test]
    fn test_run_missing_data_fails() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = EngineConfig {
            faction_data_path: dir.path().join("nowhere"),
            save_dir: dir.path().join("saves"),
            ..EngineConfig::default()
        };
        assert!(run(&config).is_err());
    }
}
