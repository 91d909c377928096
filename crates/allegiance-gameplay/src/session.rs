//! Faction session: the registry, relationship index and standing store of
//! one game, behind the boundary operations gameplay code calls.
//!
//! Nothing here is global. A session is created empty, filled by
//! [`FactionSession::load`], restarted by [`FactionSession::reset`] and torn
//! down by [`FactionSession::free`]; tests simply build their own.

use allegiance_common::{FactionId, LogoHandle};
use tracing::{debug, error, info, warn};

use crate::faction::{
    Faction, FactionDefinition, FactionError, FactionRegistry, FactionResult,
};
use crate::logo::LogoStore;
use crate::policy::StandingPolicy;
use crate::presentation::{Colour, StandingDisplay};
use crate::propagation::StandingEngine;
use crate::relations::{Relation, RelationshipIndex};
use crate::save::StandingsSave;
use crate::standing::{StandingChange, StandingStore};

/// Everything that exists only while factions are loaded.
#[derive(Debug, Clone)]
struct Loaded {
    registry: FactionRegistry,
    relations: RelationshipIndex,
    store: StandingStore,
}

/// Faction state of one game session.
#[derive(Debug, Clone)]
pub struct FactionSession {
    loaded: Option<Loaded>,
    policy: StandingPolicy,
    strict_handles: bool,
}

impl FactionSession {
    /// Creates an empty session with a validated policy.
    ///
    /// Invalid handles trip a debug assertion in debug builds; see
    /// [`FactionSession::with_strict_handles`].
    pub fn new(policy: StandingPolicy) -> FactionResult<Self> {
        policy.validate()?;
        Ok(Self {
            loaded: None,
            policy,
            strict_handles: cfg!(debug_assertions),
        })
    }

    /// Creates a session and loads definitions into it.
    pub fn with_factions(
        definitions: &[FactionDefinition],
        logos: &mut dyn LogoStore,
        policy: StandingPolicy,
    ) -> FactionResult<Self> {
        let mut session = Self::new(policy)?;
        session.load(definitions, logos)?;
        Ok(session)
    }

    /// Sets whether invalid handles are treated as fatal caller bugs.
    ///
    /// When set (the debug-build default), an invalid handle fails a
    /// `debug_assert!`. When cleared it is logged and returned as
    /// [`FactionError::InvalidHandle`].
    #[must_use]
    pub fn with_strict_handles(mut self, strict: bool) -> Self {
        self.strict_handles = strict;
        self
    }

    /// The session's standing policy.
    #[must_use]
    pub fn policy(&self) -> &StandingPolicy {
        &self.policy
    }

    /// Checks if factions are loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Loads faction definitions, replacing anything already loaded.
    ///
    /// On failure the session is left with no factions at all.
    pub fn load(
        &mut self,
        definitions: &[FactionDefinition],
        logos: &mut dyn LogoStore,
    ) -> FactionResult<()> {
        if self.loaded.is_some() {
            self.free(logos);
        }

        let registry = match FactionRegistry::build(definitions, logos) {
            Ok(registry) => registry,
            Err(e) => {
                error!("Failed to load factions: {}", e);
                return Err(e);
            },
        };
        let relations = RelationshipIndex::build(&registry);
        let store = StandingStore::new(registry.slots(), &self.policy);

        info!("Faction session ready with {} factions", registry.len());
        self.loaded = Some(Loaded {
            registry,
            relations,
            store,
        });
        Ok(())
    }

    /// Releases every faction and logo. All handles become invalid.
    pub fn free(&mut self, logos: &mut dyn LogoStore) {
        if let Some(mut loaded) = self.loaded.take() {
            loaded.registry.free(logos);
            info!("Faction session freed");
        }
    }

    /// Puts every standing back at the default without reloading factions.
    pub fn reset(&mut self) {
        if let Some(loaded) = &mut self.loaded {
            loaded.store.reset();
            info!("Player standings reset");
        }
    }

    // ------------------------------------------------------------------
    // Registry queries
    // ------------------------------------------------------------------

    /// Resolves a machine name to a handle.
    pub fn faction_get(&self, name: &str) -> FactionResult<FactionId> {
        self.state()?.registry.handle(name)
    }

    /// Short machine name of a faction.
    pub fn faction_name(&self, faction: FactionId) -> FactionResult<&str> {
        Ok(self.faction(faction)?.name())
    }

    /// Long display name of a faction.
    pub fn faction_long_name(&self, faction: FactionId) -> FactionResult<&str> {
        Ok(self.faction(faction)?.long_name())
    }

    /// Logo handle of a faction, if it has one.
    pub fn faction_logo(&self, faction: FactionId) -> FactionResult<Option<LogoHandle>> {
        Ok(self.faction(faction)?.logo())
    }

    /// Handles of every real faction.
    pub fn faction_ids(&self) -> Vec<FactionId> {
        self.loaded
            .as_ref()
            .map(|loaded| loaded.registry.ids().collect())
            .unwrap_or_default()
    }

    /// Number of real factions loaded.
    #[must_use]
    pub fn faction_count(&self) -> usize {
        self.loaded.as_ref().map_or(0, |loaded| loaded.registry.len())
    }

    // ------------------------------------------------------------------
    // Relationship queries
    // ------------------------------------------------------------------

    /// True if the two factions are enemies.
    ///
    /// The player pseudo-faction is not a political actor; passing it is a
    /// caller bug and answers `false`.
    pub fn are_enemies(&self, a: FactionId, b: FactionId) -> bool {
        self.relation(a, b) == Relation::Enemy
    }

    /// True if the two factions are allies (and not enemies).
    pub fn are_allies(&self, a: FactionId, b: FactionId) -> bool {
        self.relation(a, b) == Relation::Ally
    }

    /// Symmetric relation between two factions.
    ///
    /// Fails with `InvalidHandle` if either handle is not a real faction,
    /// the player pseudo-faction included.
    pub fn try_relation(&self, a: FactionId, b: FactionId) -> FactionResult<Relation> {
        let loaded = self.standing_state(a)?;
        self.standing_state(b)?;
        Ok(loaded.relations.relation(a, b))
    }

    /// Symmetric relation between two factions, `Neutral` for bad handles.
    pub fn relation(&self, a: FactionId, b: FactionId) -> Relation {
        self.try_relation(a, b).unwrap_or(Relation::Neutral)
    }

    /// Enemies of a faction.
    pub fn enemies_of(&self, faction: FactionId) -> FactionResult<&[FactionId]> {
        let loaded = self.standing_state(faction)?;
        Ok(loaded.relations.enemies_of(faction))
    }

    /// Allies of a faction.
    pub fn allies_of(&self, faction: FactionId) -> FactionResult<&[FactionId]> {
        let loaded = self.standing_state(faction)?;
        Ok(loaded.relations.allies_of(faction))
    }

    // ------------------------------------------------------------------
    // Player standing
    // ------------------------------------------------------------------

    /// Changes standing with a faction and propagates to its allies and enemies.
    pub fn mod_player(
        &mut self,
        faction: FactionId,
        delta: i32,
    ) -> FactionResult<Vec<StandingChange>> {
        self.standing_state(faction)?;
        let changes = match &mut self.loaded {
            Some(loaded) => {
                StandingEngine::new(&loaded.registry, &loaded.relations, &self.policy)
                    .modify(&mut loaded.store, faction, delta)
            },
            None => None,
        };
        let changes = changes.ok_or(FactionError::InvalidHandle(faction))?;
        for change in &changes {
            debug!(
                "Standing with {}: {} -> {}",
                change.faction, change.before, change.after
            );
        }
        Ok(changes)
    }

    /// Changes standing with one faction only.
    pub fn mod_player_raw(
        &mut self,
        faction: FactionId,
        delta: i32,
    ) -> FactionResult<StandingChange> {
        self.standing_state(faction)?;
        let change = match &mut self.loaded {
            Some(loaded) => {
                StandingEngine::new(&loaded.registry, &loaded.relations, &self.policy)
                    .modify_raw(&mut loaded.store, faction, delta)
            },
            None => None,
        };
        let change = change.ok_or(FactionError::InvalidHandle(faction))?;
        debug!(
            "Standing with {} (raw): {} -> {}",
            change.faction, change.before, change.after
        );
        Ok(change)
    }

    /// Player's current standing with a faction.
    pub fn player_standing(&self, faction: FactionId) -> FactionResult<i32> {
        let loaded = self.standing_state(faction)?;
        loaded
            .store
            .get(faction)
            .ok_or(FactionError::InvalidHandle(faction))
    }

    /// Alias of [`FactionSession::player_standing`], named after
    /// [`FactionSession::mod_player`].
    pub fn get_player(&self, faction: FactionId) -> FactionResult<i32> {
        self.player_standing(faction)
    }

    /// Label for a standing value.
    #[must_use]
    pub fn standing_label(&self, value: i32) -> &str {
        self.policy.label(value)
    }

    /// Label for the player's standing with a faction.
    pub fn player_standing_label(&self, faction: FactionId) -> FactionResult<&str> {
        let value = self.player_standing(faction)?;
        Ok(self.policy.label(value))
    }

    /// Colour cue for the player's standing with a faction.
    pub fn standing_colour(&self, faction: FactionId) -> FactionResult<Colour> {
        Ok(self.standing_display(faction)?.colour)
    }

    /// Value, label, tier and colour for the player's standing with a faction.
    pub fn standing_display(&self, faction: FactionId) -> FactionResult<StandingDisplay<'_>> {
        let value = self.player_standing(faction)?;
        Ok(self.policy.display(value))
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Captures every standing keyed by faction machine name.
    pub fn snapshot(&self) -> FactionResult<StandingsSave> {
        let loaded = self.state()?;
        let mut save = StandingsSave::new();
        for (id, value) in loaded.store.iter() {
            let name = loaded.registry.name(id)?;
            save.set(name, value);
        }
        Ok(save)
    }

    /// Restores standings from a save.
    ///
    /// Factions missing from the save keep their current standing; saved
    /// names with no loaded faction are skipped. Values are clamped.
    /// Returns how many standings were restored.
    pub fn restore(&mut self, save: &StandingsSave) -> FactionResult<usize> {
        let loaded = self.loaded.as_mut().ok_or(FactionError::NotLoaded)?;
        let mut restored = 0;
        for entry in &save.standings {
            match loaded.registry.handle(&entry.faction) {
                Ok(id) if !id.is_player() => {
                    if loaded.store.set_raw(id, entry.standing).is_some() {
                        restored += 1;
                    }
                },
                _ => warn!("Saved standing for unknown faction '{}' skipped", entry.faction),
            }
        }
        info!("Restored {} of {} saved standings", restored, save.len());
        Ok(restored)
    }

    // ------------------------------------------------------------------
    // Handle checks
    // ------------------------------------------------------------------

    fn state(&self) -> FactionResult<&Loaded> {
        self.loaded.as_ref().ok_or(FactionError::NotLoaded)
    }

    fn faction(&self, faction: FactionId) -> FactionResult<&Faction> {
        match self.loaded.as_ref().map(|loaded| loaded.registry.get(faction)) {
            Some(Ok(record)) => Ok(record),
            _ => Err(self.invalid_handle(faction)),
        }
    }

    /// Loaded state, if `faction` is a real faction that can hold a standing.
    fn standing_state(&self, faction: FactionId) -> FactionResult<&Loaded> {
        match &self.loaded {
            Some(loaded) if loaded.registry.is_faction(faction) => Ok(loaded),
            _ => Err(self.invalid_handle(faction)),
        }
    }

    fn invalid_handle(&self, faction: FactionId) -> FactionError {
        error!("Invalid faction handle {}", faction);
        debug_assert!(!self.strict_handles, "invalid faction handle {faction}");
        FactionError::InvalidHandle(faction)
    }
}
