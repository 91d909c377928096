//! Symmetric enemy/ally index over the registry's declared relations.
//!
//! Data may declare a relation from one side only; queries answer it from
//! both. When the declared data would make a pair both enemies and allies,
//! enemy status wins. That precedence is applied once, here, when the
//! index is built, so the two predicates are mutually exclusive by
//! construction rather than by the order in which callers test them.

use allegiance_common::FactionId;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::faction::FactionRegistry;

/// Relation between two factions after symmetrisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Relation {
    /// No declared relation
    #[default]
    Neutral,
    /// Allied
    Ally,
    /// Hostile
    Enemy,
}

/// Precomputed symmetric adjacency for every faction in a registry.
#[derive(Debug, Clone, Default)]
pub struct RelationshipIndex {
    /// Sorted enemy handles per slot
    enemies: Vec<Vec<FactionId>>,
    /// Sorted ally handles per slot, never overlapping `enemies`
    allies: Vec<Vec<FactionId>>,
}

impl RelationshipIndex {
    /// Builds the index from a registry.
    #[must_use]
    pub fn build(registry: &FactionRegistry) -> Self {
        let slots = registry.slots();
        let mut enemies = vec![Vec::new(); slots];
        let mut allies = vec![Vec::new(); slots];

        for faction in registry.iter() {
            let a = faction.id();
            for &b in faction.enemies() {
                enemies[a.index()].push(b);
                enemies[b.index()].push(a);
            }
        }
        for list in &mut enemies {
            list.sort_unstable();
            list.dedup();
        }

        let mut conflicts = 0;
        for faction in registry.iter() {
            let a = faction.id();
            for &b in faction.allies() {
                if enemies[a.index()].binary_search(&b).is_ok() {
                    warn!(
                        "Faction '{}' declares {} an ally, but they are enemies; enemy wins",
                        faction.name(),
                        b
                    );
                    conflicts += 1;
                    continue;
                }
                allies[a.index()].push(b);
                allies[b.index()].push(a);
            }
        }
        for list in &mut allies {
            list.sort_unstable();
            list.dedup();
        }

        debug!(
            "Built relationship index for {} factions ({} ally conflicts)",
            registry.len(),
            conflicts
        );
        Self { enemies, allies }
    }

    /// Symmetric relation between two factions.
    ///
    /// A faction has no relation with itself, and the player pseudo-faction
    /// has no relation with anything.
    #[must_use]
    pub fn relation(&self, a: FactionId, b: FactionId) -> Relation {
        if a == b || a.is_player() || b.is_player() {
            return Relation::Neutral;
        }
        if contains(&self.enemies, a, b) {
            Relation::Enemy
        } else if contains(&self.allies, a, b) {
            Relation::Ally
        } else {
            Relation::Neutral
        }
    }

    /// True if either faction declares the other an enemy.
    #[must_use]
    pub fn are_enemies(&self, a: FactionId, b: FactionId) -> bool {
        self.relation(a, b) == Relation::Enemy
    }

    /// True if either faction declares the other an ally and they are not enemies.
    #[must_use]
    pub fn are_allies(&self, a: FactionId, b: FactionId) -> bool {
        self.relation(a, b) == Relation::Ally
    }

    /// Enemies of a faction, sorted by handle.
    #[must_use]
    pub fn enemies_of(&self, faction: FactionId) -> &[FactionId] {
        self.enemies.get(faction.index()).map(Vec::as_slice).unwrap_or_default()
    }

    /// Allies of a faction, sorted by handle.
    #[must_use]
    pub fn allies_of(&self, faction: FactionId) -> &[FactionId] {
        self.allies.get(faction.index()).map(Vec::as_slice).unwrap_or_default()
    }
}

fn contains(table: &[Vec<FactionId>], a: FactionId, b: FactionId) -> bool {
    table
        .get(a.index())
        .is_some_and(|list| list.binary_search(&b).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faction::FactionDefinition;
    use crate::logo::NullLogoStore;
    use proptest::prelude::*;

    fn registry(defs: &[FactionDefinition]) -> FactionRegistry {
        FactionRegistry::build(defs, &mut NullLogoStore).expect("valid definitions")
    }

    fn scenario() -> FactionRegistry {
        registry(&[
            FactionDefinition::new("Empire").with_enemy("Pirates"),
            FactionDefinition::new("Pirates").with_enemy("Empire"),
            FactionDefinition::new("Trader").with_ally("Empire"),
            FactionDefinition::new("Independent"),
        ])
    }

    #[test]
    fn test_declared_relations() {
        let registry = scenario();
        let index = RelationshipIndex::build(&registry);
        let [empire, pirates, trader, independent] = [1, 2, 3, 4].map(FactionId::new);

        assert!(index.are_enemies(empire, pirates));
        assert!(index.are_allies(empire, trader));
        assert!(!index.are_enemies(empire, trader));
        assert!(!index.are_allies(pirates, trader));
        assert_eq!(index.relation(independent, empire), Relation::Neutral);
    }

    #[test]
    fn test_one_sided_declaration_is_symmetric() {
        let registry = scenario();
        let index = RelationshipIndex::build(&registry);
        let (empire, trader) = (FactionId::new(1), FactionId::new(3));

        // Only Trader declares the alliance
        assert!(index.are_allies(trader, empire));
        assert!(index.are_allies(empire, trader));
        assert_eq!(index.allies_of(empire), &[trader]);
    }

    #[test]
    fn test_self_and_player_have_no_relation() {
        let registry = scenario();
        let index = RelationshipIndex::build(&registry);
        let empire = FactionId::new(1);

        assert_eq!(index.relation(empire, empire), Relation::Neutral);
        assert!(!index.are_enemies(FactionId::PLAYER, empire));
        assert!(!index.are_allies(empire, FactionId::PLAYER));
    }

    #[test]
    fn test_enemy_precedence_across_factions() {
        // Empire calls Rebels an enemy, Rebels call Empire an ally.
        let registry = registry(&[
            FactionDefinition::new("Empire").with_enemy("Rebels"),
            FactionDefinition::new("Rebels").with_ally("Empire"),
        ]);
        let index = RelationshipIndex::build(&registry);
        let (empire, rebels) = (FactionId::new(1), FactionId::new(2));

        assert!(index.are_enemies(empire, rebels));
        assert!(index.are_enemies(rebels, empire));
        assert!(!index.are_allies(empire, rebels));
        assert!(!index.are_allies(rebels, empire));
        assert!(index.allies_of(rebels).is_empty());
    }

    #[test]
    fn test_unknown_handles_are_neutral() {
        let registry = scenario();
        let index = RelationshipIndex::build(&registry);
        assert_eq!(
            index.relation(FactionId::new(1), FactionId::new(99)),
            Relation::Neutral
        );
        assert!(index.enemies_of(FactionId::new(99)).is_empty());
    }

    /// Random relation declarations over `n` factions.
    fn arb_definitions() -> impl Strategy<Value = Vec<FactionDefinition>> {
        (2usize..8).prop_flat_map(|n| {
            prop::collection::vec(prop::collection::vec(0u8..3, n), n).prop_map(move |matrix| {
                (0..n)
                    .map(|i| {
                        let mut def = FactionDefinition::new(format!("F{i}"));
                        for (j, kind) in matrix[i].iter().enumerate() {
                            if i == j {
                                continue;
                            }
                            match kind {
                                1 => def = def.with_enemy(format!("F{j}")),
                                2 => def = def.with_ally(format!("F{j}")),
                                _ => {},
                            }
                        }
                        def
                    })
                    .collect()
            })
        })
    }

    proptest! {
        #[test]
        fn prop_relations_symmetric_and_exclusive(defs in arb_definitions()) {
            let registry = registry(&defs);
            let index = RelationshipIndex::build(&registry);
            let ids: Vec<_> = registry.ids().collect();

            for &a in &ids {
                for &b in &ids {
                    prop_assert_eq!(index.are_enemies(a, b), index.are_enemies(b, a));
                    prop_assert_eq!(index.are_allies(a, b), index.are_allies(b, a));
                    prop_assert!(!(index.are_enemies(a, b) && index.are_allies(a, b)));
                }
            }
        }

        #[test]
        fn prop_enemy_iff_declared_by_either(defs in arb_definitions()) {
            let registry = registry(&defs);
            let index = RelationshipIndex::build(&registry);

            for fa in registry.iter() {
                for fb in registry.iter() {
                    if fa.id() == fb.id() {
                        continue;
                    }
                    let declared =
                        fa.enemies().contains(&fb.id()) || fb.enemies().contains(&fa.id());
                    prop_assert_eq!(index.are_enemies(fa.id(), fb.id()), declared);
                }
            }
        }
    }
}
