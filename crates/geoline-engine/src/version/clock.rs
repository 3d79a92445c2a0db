use std::sync::atomic::{AtomicU64, Ordering};

static CLOCK: AtomicU64 = AtomicU64::new(0);

/// A stamp from the logical modification clock.
///
/// `Version::UNSET` orders before every stamp returned by [`Version::next`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Version(u64);

impl Version {
    pub const UNSET: Version = Version(0);

    /// Draws a fresh stamp, strictly greater than all previously drawn ones.
    #[inline]
    pub fn next() -> Self {
        Version(CLOCK.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Re-stamps `self` with a fresh value.
    #[inline]
    pub fn touch(&mut self) {
        *self = Self::next();
    }

    #[inline]
    pub fn is_set(self) -> bool {
        self != Self::UNSET
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}
