//! Validated 1-indexed rank.

use std::fmt;
use std::num::NonZeroUsize;

use tracing::warn;

/// Which order statistic to select. `1` is the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank(NonZeroUsize);

impl Rank {
    /// The minimum.
    pub const MIN: Self = Self(NonZeroUsize::MIN);

    /// Rank `k`, or `None` for zero.
    #[inline]
    pub const fn new(k: usize) -> Option<Self> {
        match NonZeroUsize::new(k) {
            Some(k) => Some(Self(k)),
            None => None,
        }
    }

    /// Rank from a configured value, raising anything below 1 to 1.
    ///
    /// This is a construction-time correction and logs a warning when it
    /// kicks in.
    pub fn clamped(k: i64) -> Self {
        if k < 1 {
            warn!(requested = k, "invalid event index, changed to 1");
            return Self::MIN;
        }
        usize::try_from(k)
            .ok()
            .and_then(Self::new)
            .unwrap_or(Self(NonZeroUsize::MAX))
    }

    #[inline]
    pub const fn get(&self) -> usize {
        self.0.get()
    }
}

impl Default for Rank {
    fn default() -> Self {
        Self::MIN
    }
}

impl From<NonZeroUsize> for Rank {
    fn from(k: NonZeroUsize) -> Self {
        Self(k)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
