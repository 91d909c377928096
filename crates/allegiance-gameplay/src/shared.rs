//! Faction session shared between gameplay systems.

use std::sync::Arc;

use allegiance_common::FactionId;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::events::StandingEvent;
use crate::faction::FactionResult;
use crate::session::FactionSession;
use crate::standing::StandingChange;

/// Cloneable handle to one session behind a read/write lock.
///
/// Queries share the read lock. Every standing write takes the write lock
/// for the whole operation, propagation pass included, so no reader ever
/// sees a half-propagated change.
#[derive(Debug, Clone)]
pub struct SharedFactions {
    inner: Arc<RwLock<FactionSession>>,
}

impl SharedFactions {
    /// Wraps a session.
    #[must_use]
    pub fn new(session: FactionSession) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    /// Read access to the session.
    pub fn read(&self) -> RwLockReadGuard<'_, FactionSession> {
        self.inner.read()
    }

    /// Write access to the session.
    pub fn write(&self) -> RwLockWriteGuard<'_, FactionSession> {
        self.inner.write()
    }

    /// Player's standing with a faction.
    pub fn player_standing(&self, faction: FactionId) -> FactionResult<i32> {
        self.inner.read().player_standing(faction)
    }

    /// Propagating standing change.
    pub fn mod_player(&self, faction: FactionId, delta: i32) -> FactionResult<Vec<StandingChange>> {
        self.inner.write().mod_player(faction, delta)
    }

    /// Direct standing change.
    pub fn mod_player_raw(&self, faction: FactionId, delta: i32) -> FactionResult<StandingChange> {
        self.inner.write().mod_player_raw(faction, delta)
    }

    /// Applies a gameplay event.
    pub fn apply_event(&self, event: &StandingEvent) -> FactionResult<Vec<StandingChange>> {
        self.inner.write().apply_event(event)
    }

    /// Checks if two factions are enemies.
    pub fn are_enemies(&self, a: FactionId, b: FactionId) -> bool {
        self.inner.read().are_enemies(a, b)
    }

    /// Checks if two factions are allies.
    pub fn are_allies(&self, a: FactionId, b: FactionId) -> bool {
        self.inner.read().are_allies(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faction::FactionDefinition;
    use crate::logo::NullLogoStore;
    use crate::policy::StandingPolicy;
    use std::thread;

    fn shared() -> SharedFactions {
        let defs = [
            FactionDefinition::new("Empire").with_enemy("Pirates"),
            FactionDefinition::new("Pirates"),
            FactionDefinition::new("Trader").with_ally("Empire"),
        ];
        let session =
            FactionSession::with_factions(&defs, &mut NullLogoStore, StandingPolicy::default())
                .expect("valid definitions");
        SharedFactions::new(session)
    }

    #[test]
    fn test_writes_from_many_threads() {
        let factions = shared();
        let empire = factions.read().faction_get("Empire").expect("known faction");

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let factions = factions.clone();
                thread::spawn(move || {
                    for _ in 0..10 {
                        factions.mod_player_raw(empire, 1).expect("valid handle");
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().expect("worker panicked");
        }

        assert_eq!(factions.player_standing(empire).expect("standing"), 40);
    }

    #[test]
    fn test_propagation_is_atomic_for_readers() {
        let factions = shared();
        let (empire, trader) = {
            let session = factions.read();
            (
                session.faction_get("Empire").expect("known faction"),
                session.faction_get("Trader").expect("known faction"),
            )
        };

        let writer = {
            let factions = factions.clone();
            thread::spawn(move || {
                for _ in 0..20 {
                    factions.mod_player(empire, 4).expect("valid handle");
                }
            })
        };

        // Each step moves Empire by 4 and Trader by 2
        for _ in 0..50 {
            let session = factions.read();
            let e = session.player_standing(empire).expect("standing");
            let t = session.player_standing(trader).expect("standing");
            assert_eq!(t, e / 2);
        }
        writer.join().expect("writer panicked");

        assert_eq!(factions.player_standing(empire).expect("standing"), 80);
        assert!(factions.are_allies(empire, trader));
    }
}
