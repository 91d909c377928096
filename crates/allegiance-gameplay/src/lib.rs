//! # Allegiance Gameplay
//!
//! Faction politics and player standing.
//!
//! This crate provides:
//! - Faction registry with stable handles and a reserved player slot
//! - Symmetric enemy/ally relationships with enemy precedence
//! - Clamped player standings with ally/enemy propagation
//! - Standing labels, tiers and colour cues
//! - Gameplay events that move standing
//! - Standing save data
//! - A lock-guarded session for shared access

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod events;
pub mod faction;
pub mod logo;
pub mod policy;
pub mod presentation;
pub mod propagation;
pub mod relations;
pub mod save;
pub mod session;
pub mod shared;
pub mod standing;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::events::*;
    pub use crate::faction::*;
    pub use crate::logo::*;
    pub use crate::policy::*;
    pub use crate::presentation::*;
    pub use crate::propagation::*;
    pub use crate::relations::*;
    pub use crate::save::*;
    pub use crate::session::*;
    pub use crate::shared::*;
    pub use crate::standing::*;
}

pub use prelude::*;
