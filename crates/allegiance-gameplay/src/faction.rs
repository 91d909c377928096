//! Faction registry: definitions, handles and validation.

use ahash::AHashMap;
use allegiance_common::{FactionId, LogoHandle};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::logo::LogoStore;
use crate::policy::PolicyError;

/// Machine name of the player pseudo-faction.
pub const PLAYER_NAME: &str = "Player";

/// Which static list a relation comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// Declared enemy
    Enemy,
    /// Declared ally
    Ally,
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enemy => f.write_str("enemy"),
            Self::Ally => f.write_str("ally"),
        }
    }
}

/// Problems with faction definitions found at load time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// A faction has no machine name
    #[error("Faction definition {0} has an empty name")]
    EmptyName(usize),
    /// Two factions share a machine name
    #[error("Duplicate faction name: {0}")]
    DuplicateName(String),
    /// A faction uses the player's reserved name
    #[error("Faction name '{0}' is reserved")]
    ReservedName(String),
    /// An enemy/ally entry names no known faction
    #[error("Faction '{faction}' lists unknown {kind} '{target}'")]
    UnknownReference {
        /// Faction holding the reference
        faction: String,
        /// Which list it is in
        kind: RelationKind,
        /// The unresolved name
        target: String,
    },
    /// A faction lists itself as enemy or ally
    #[error("Faction '{faction}' lists itself as {kind}")]
    SelfReference {
        /// Offending faction
        faction: String,
        /// Which list it is in
        kind: RelationKind,
    },
    /// More factions than handles
    #[error("Too many factions: {0}")]
    TooManyFactions(usize),
}

/// Faction error types.
#[derive(Debug, Error)]
pub enum FactionError {
    /// Definitions failed validation
    #[error("Invalid faction definitions: {0}")]
    Definition(#[from] DefinitionError),
    /// Standing policy failed validation
    #[error("Invalid standing policy: {0}")]
    Policy(#[from] PolicyError),
    /// No faction with this name
    #[error("Faction not found: {0}")]
    NotFound(String),
    /// Handle out of range, freed, or not valid for the operation
    #[error("Invalid faction handle: {0}")]
    InvalidHandle(FactionId),
    /// No factions are loaded
    #[error("Factions are not loaded")]
    NotLoaded,
}

/// Result type for faction operations.
pub type FactionResult<T> = Result<T, FactionError>;

/// A faction as supplied by the data source.
///
/// Relations are given by machine name and resolved to handles at load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionDefinition {
    /// Unique machine name
    pub name: String,
    /// Display name (defaults to the machine name)
    #[serde(default)]
    pub long_name: Option<String>,
    /// Logo asset path
    #[serde(default)]
    pub logo: Option<String>,
    /// Names of declared enemies
    #[serde(default)]
    pub enemies: Vec<String>,
    /// Names of declared allies
    #[serde(default)]
    pub allies: Vec<String>,
}

impl FactionDefinition {
    /// Creates a definition with no relations.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            long_name: None,
            logo: None,
            enemies: Vec::new(),
            allies: Vec::new(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = Some(long_name.into());
        self
    }

    /// Sets the logo path.
    #[must_use]
    pub fn with_logo(mut self, path: impl Into<String>) -> Self {
        self.logo = Some(path.into());
        self
    }

    /// Adds a declared enemy.
    #[must_use]
    pub fn with_enemy(mut self, name: impl Into<String>) -> Self {
        self.enemies.push(name.into());
        self
    }

    /// Adds a declared ally.
    #[must_use]
    pub fn with_ally(mut self, name: impl Into<String>) -> Self {
        self.allies.push(name.into());
        self
    }
}

/// A loaded faction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Faction {
    id: FactionId,
    name: String,
    long_name: String,
    logo: Option<LogoHandle>,
    enemies: Vec<FactionId>,
    allies: Vec<FactionId>,
}

impl Faction {
    fn player() -> Self {
        Self {
            id: FactionId::PLAYER,
            name: PLAYER_NAME.to_string(),
            long_name: PLAYER_NAME.to_string(),
            logo: None,
            enemies: Vec::new(),
            allies: Vec::new(),
        }
    }

    /// Handle of this faction.
    #[must_use]
    pub fn id(&self) -> FactionId {
        self.id
    }

    /// Machine name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display name.
    #[must_use]
    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    /// Logo handle, if the asset subsystem provided one.
    #[must_use]
    pub fn logo(&self) -> Option<LogoHandle> {
        self.logo
    }

    /// Factions this one declares as enemies.
    #[must_use]
    pub fn enemies(&self) -> &[FactionId] {
        &self.enemies
    }

    /// Factions this one declares as allies.
    #[must_use]
    pub fn allies(&self) -> &[FactionId] {
        &self.allies
    }
}

/// Registry of every faction in a session.
///
/// Factions live in a dense table indexed by handle. Slot 0 always holds
/// the player pseudo-faction; real factions get handles `1..=len()` in
/// definition order.
#[derive(Debug, Clone)]
pub struct FactionRegistry {
    factions: Vec<Faction>,
    by_name: AHashMap<String, FactionId>,
}

impl FactionRegistry {
    /// Builds a registry from definitions.
    ///
    /// Validation runs to completion before any logo is acquired, so a
    /// failed build holds no assets.
    pub fn build(
        definitions: &[FactionDefinition],
        logos: &mut dyn LogoStore,
    ) -> FactionResult<Self> {
        if definitions.len() >= usize::from(u16::MAX) {
            return Err(DefinitionError::TooManyFactions(definitions.len()).into());
        }

        let mut by_name = AHashMap::with_capacity(definitions.len() + 1);
        by_name.insert(PLAYER_NAME.to_string(), FactionId::PLAYER);

        for (index, def) in definitions.iter().enumerate() {
            if def.name.trim().is_empty() {
                return Err(DefinitionError::EmptyName(index).into());
            }
            if def.name == PLAYER_NAME {
                return Err(DefinitionError::ReservedName(def.name.clone()).into());
            }
            let id = FactionId::new((index + 1) as u16);
            if by_name.insert(def.name.clone(), id).is_some() {
                return Err(DefinitionError::DuplicateName(def.name.clone()).into());
            }
        }

        let mut factions = Vec::with_capacity(definitions.len() + 1);
        factions.push(Faction::player());

        for (index, def) in definitions.iter().enumerate() {
            let id = FactionId::new((index + 1) as u16);
            let enemies = resolve(&by_name, def, &def.enemies, RelationKind::Enemy, id)?;
            let mut allies = resolve(&by_name, def, &def.allies, RelationKind::Ally, id)?;

            allies.retain(|ally| {
                let conflict = enemies.contains(ally);
                if conflict {
                    warn!(
                        "Faction '{}' lists {} as both enemy and ally; treating as enemy",
                        def.name, ally
                    );
                }
                !conflict
            });

            factions.push(Faction {
                id,
                name: def.name.clone(),
                long_name: def.long_name.clone().unwrap_or_else(|| def.name.clone()),
                logo: None,
                enemies,
                allies,
            });
        }

        for (faction, def) in factions.iter_mut().skip(1).zip(definitions) {
            if let Some(path) = &def.logo {
                faction.logo = logos.acquire(path);
                if faction.logo.is_none() {
                    warn!("Logo '{}' for faction '{}' is unavailable", path, def.name);
                }
            }
        }

        info!("Loaded {} factions", definitions.len());
        Ok(Self { factions, by_name })
    }

    /// Releases every logo handle and empties the registry.
    pub fn free(&mut self, logos: &mut dyn LogoStore) {
        let mut released = 0;
        for faction in &mut self.factions {
            if let Some(handle) = faction.logo.take() {
                logos.release(handle);
                released += 1;
            }
        }
        debug!("Released {} faction logos", released);
        self.factions.clear();
        self.by_name.clear();
    }

    /// Resolves a machine name to a handle.
    pub fn handle(&self, name: &str) -> FactionResult<FactionId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| FactionError::NotFound(name.to_string()))
    }

    /// Gets a faction by handle.
    pub fn get(&self, id: FactionId) -> FactionResult<&Faction> {
        self.factions
            .get(id.index())
            .ok_or(FactionError::InvalidHandle(id))
    }

    /// Checks whether a handle names a real (non-player) faction.
    #[must_use]
    pub fn is_faction(&self, id: FactionId) -> bool {
        !id.is_player() && id.index() < self.factions.len()
    }

    /// Short machine name.
    pub fn name(&self, id: FactionId) -> FactionResult<&str> {
        self.get(id).map(Faction::name)
    }

    /// Long display name.
    pub fn long_name(&self, id: FactionId) -> FactionResult<&str> {
        self.get(id).map(Faction::long_name)
    }

    /// Logo handle.
    pub fn logo(&self, id: FactionId) -> FactionResult<Option<LogoHandle>> {
        self.get(id).map(Faction::logo)
    }

    /// Handles of every real faction, in handle order.
    pub fn ids(&self) -> impl Iterator<Item = FactionId> + '_ {
        self.factions.iter().skip(1).map(Faction::id)
    }

    /// Every real faction, in handle order.
    pub fn iter(&self) -> impl Iterator<Item = &Faction> {
        self.factions.iter().skip(1)
    }

    /// Number of real factions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factions.len().saturating_sub(1)
    }

    /// Checks if there are no real factions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of a table indexed by handle, player slot included.
    #[must_use]
    pub fn slots(&self) -> usize {
        self.factions.len()
    }
}

fn resolve(
    by_name: &AHashMap<String, FactionId>,
    def: &FactionDefinition,
    names: &[String],
    kind: RelationKind,
    own: FactionId,
) -> FactionResult<Vec<FactionId>> {
    let mut ids = Vec::with_capacity(names.len());
    for target in names {
        let id = match by_name.get(target.as_str()) {
            Some(id) if !id.is_player() => *id,
            _ => {
                return Err(DefinitionError::UnknownReference {
                    faction: def.name.clone(),
                    kind,
                    target: target.clone(),
                }
                .into())
            },
        };
        if id == own {
            return Err(DefinitionError::SelfReference {
                faction: def.name.clone(),
                kind,
            }
            .into());
        }
        if ids.contains(&id) {
            debug!("Faction '{}' lists {} '{}' twice", def.name, kind, target);
            continue;
        }
        ids.push(id);
    }
    Ok(ids)
}
