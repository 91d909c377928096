//! # Allegiance Common
//!
//! Common types shared by the Allegiance crates:
//! - Handle types (FactionId, LogoHandle)
//! - Version information for data files and saves
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_handle_is_reserved() {
        assert!(FactionId::PLAYER.is_player());
        assert_eq!(FactionId::PLAYER.raw(), 0);
        assert!(!FactionId::new(1).is_player());
        assert_eq!(FactionId::new(7).index(), 7);
    }

    #[test]
    fn test_version_compatibility() {
        let v1 = SchemaVersion::new(1, 0, 0);
        let v2 = SchemaVersion::new(1, 1, 0);
        let v3 = SchemaVersion::new(2, 0, 0);

        // Same major reads across minor versions, either direction
        assert!(v2.can_read(&v1));
        assert!(v1.can_read(&v2));
        // Different major versions are incompatible
        assert!(!v1.can_read(&v3));
        assert!(!v3.can_read(&v1));
    }

    #[test]
    fn test_version_parse() {
        assert_eq!(
            SchemaVersion::parse("1.2.3").expect("valid version"),
            SchemaVersion::new(1, 2, 3)
        );
        assert!(SchemaVersion::parse("1.x").is_err());
        assert!(SchemaVersion::parse("").is_err());
    }

    #[test]
    fn test_io_error_converts() {
        fn read_missing() -> AllegianceResult<String> {
            Ok(std::fs::read_to_string("/nonexistent/allegiance/file")?)
        }
        assert!(matches!(read_missing(), Err(AllegianceError::Io(_))));
    }

    #[test]
    fn test_magic_bytes() {
        assert!(MagicBytes::STANDINGS.matches(b"ALST\x01\x02"));
        assert!(!MagicBytes::STANDINGS.matches(b"AL"));
        assert!(!MagicBytes::STANDINGS.matches(b"GNSV...."));
    }
}
