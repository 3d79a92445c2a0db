//! Logical modification clock.
//!
//! Dirty tracking compares [`Version`] stamps drawn from a single process-wide
//! monotonic counter, so any two stamps are ordered regardless of which object
//! produced them. No wall-clock time is involved.

mod clock;

pub use clock::Version;
