//! Seam to the asset subsystem for faction logos.

use allegiance_common::LogoHandle;

/// Hands out and takes back logo handles.
///
/// Implementations own decoding and caching. The faction registry only
/// acquires a handle per faction at load and releases it at free.
pub trait LogoStore {
    /// Acquires a handle for the logo at `path`, or `None` if it is unavailable.
    fn acquire(&mut self, path: &str) -> Option<LogoHandle>;

    /// Releases a handle previously returned by [`LogoStore::acquire`].
    fn release(&mut self, handle: LogoHandle);
}

/// Logo store that never provides logos.
///
/// For headless sessions and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogoStore;

impl LogoStore for NullLogoStore {
    fn acquire(&mut self, _path: &str) -> Option<LogoHandle> {
        None
    }

    fn release(&mut self, _handle: LogoHandle) {}
}
