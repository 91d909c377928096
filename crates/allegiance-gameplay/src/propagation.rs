//! Standing modification engine.
//!
//! A direct change applies to one faction. A propagating change applies the
//! full delta to the target, then one attenuated pass over every other
//! faction: allies move the same way, enemies the opposite way, everyone
//! else is untouched. The pass is not transitive, so allies of allies are
//! never reached and no feedback loop can form.

use allegiance_common::FactionId;

use crate::faction::FactionRegistry;
use crate::policy::StandingPolicy;
use crate::relations::{Relation, RelationshipIndex};
use crate::standing::{StandingChange, StandingStore};

/// Applies standing deltas against one registry and policy.
#[derive(Debug, Clone, Copy)]
pub struct StandingEngine<'a> {
    registry: &'a FactionRegistry,
    relations: &'a RelationshipIndex,
    policy: &'a StandingPolicy,
}

impl<'a> StandingEngine<'a> {
    /// Creates an engine over a loaded registry.
    #[must_use]
    pub fn new(
        registry: &'a FactionRegistry,
        relations: &'a RelationshipIndex,
        policy: &'a StandingPolicy,
    ) -> Self {
        Self {
            registry,
            relations,
            policy,
        }
    }

    /// Applies `delta` to one faction with clamping and nothing else.
    ///
    /// Returns `None` if the handle is not a real faction.
    pub fn modify_raw(
        &self,
        store: &mut StandingStore,
        faction: FactionId,
        delta: i32,
    ) -> Option<StandingChange> {
        if !self.registry.is_faction(faction) {
            return None;
        }
        store.add(faction, delta)
    }

    /// Applies `delta` to one faction and propagates to its allies and enemies.
    ///
    /// The first change is always the target's. Secondary changes are listed
    /// only for factions whose standing actually moved.
    pub fn modify(
        &self,
        store: &mut StandingStore,
        faction: FactionId,
        delta: i32,
    ) -> Option<Vec<StandingChange>> {
        let primary = self.modify_raw(store, faction, delta)?;
        let mut changes = vec![primary];

        let secondary = self.policy.attenuate(delta);
        if secondary == 0 {
            return Some(changes);
        }

        for other in self.registry.ids() {
            if other == faction {
                continue;
            }
            let nudge = match self.relations.relation(faction, other) {
                Relation::Ally => secondary,
                Relation::Enemy => secondary.saturating_neg(),
                Relation::Neutral => continue,
            };
            if let Some(change) = store.add(other, nudge) {
                if !change.is_noop() {
                    changes.push(change);
                }
            }
        }

        Some(changes)
    }
}
