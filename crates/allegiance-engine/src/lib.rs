//! # Allegiance Engine
//!
//! Host side of the faction system: configuration, faction data files,
//! logo handles and standing saves, plus the report runner behind the
//! `allegiance` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod app;
pub mod config;
pub mod faction_loader;
pub mod logo_cache;
pub mod save_manager;

pub use config::EngineConfig;
pub use faction_loader::{FactionLoadError, FactionLoader};
pub use logo_cache::LogoCache;
pub use save_manager::SaveManager;
