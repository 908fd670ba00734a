//! Compatibility status vocabulary

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// How well one annotation carries over to a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityStatus {
    /// Native equivalent exists
    Supported,
    /// Equivalent exists with caveats or extra configuration
    Partial,
    /// No equivalent; the behavior is lost
    Unsupported,
}

impl CompatibilityStatus {
    /// Sort rank: unsupported first, supported last
    #[inline]
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Unsupported => 0,
            Self::Partial => 1,
            Self::Supported => 2,
        }
    }

    /// Lowercase name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Supported => "supported",
            Self::Partial => "partial",
            Self::Unsupported => "unsupported",
        }
    }

    /// Whether this status needs a remediation guide
    #[inline]
    #[must_use]
    pub const fn needs_attention(self) -> bool {
        !matches!(self, Self::Supported)
    }
}

impl Display for CompatibilityStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate status of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    /// Every annotation is supported
    #[default]
    Ready,
    /// At least one annotation needs a workaround
    Workaround,
    /// At least one annotation cannot be migrated
    Breaking,
}

impl OverallStatus {
    /// Fold individual statuses: any unsupported wins, then any partial
    #[must_use]
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = CompatibilityStatus>,
    {
        let mut overall = Self::Ready;
        for status in statuses {
            match status {
                CompatibilityStatus::Unsupported => return Self::Breaking,
                CompatibilityStatus::Partial => overall = Self::Workaround,
                CompatibilityStatus::Supported => {}
            }
        }
        overall
    }

    /// Lowercase name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Workaround => "workaround",
            Self::Breaking => "breaking",
        }
    }
}

impl Display for OverallStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn status() -> impl Strategy<Value = CompatibilityStatus> {
        prop_oneof![
            Just(CompatibilityStatus::Supported),
            Just(CompatibilityStatus::Partial),
            Just(CompatibilityStatus::Unsupported),
        ]
    }

    #[test]
    fn empty_is_ready() {
        assert_eq!(OverallStatus::from_statuses([]), OverallStatus::Ready);
    }

    #[test]
    fn partial_means_workaround() {
        let overall = OverallStatus::from_statuses([
            CompatibilityStatus::Supported,
            CompatibilityStatus::Partial,
        ]);
        assert_eq!(overall, OverallStatus::Workaround);
    }

    #[test]
    fn rank_orders_worst_first() {
        assert!(CompatibilityStatus::Unsupported.rank() < CompatibilityStatus::Partial.rank());
        assert!(CompatibilityStatus::Partial.rank() < CompatibilityStatus::Supported.rank());
    }

    proptest! {
        #[test]
        fn prop_any_unsupported_is_breaking(
            mut statuses in proptest::collection::vec(status(), 0..16),
            at in 0usize..16,
        ) {
            let at = at.min(statuses.len());
            statuses.insert(at, CompatibilityStatus::Unsupported);
            prop_assert_eq!(OverallStatus::from_statuses(statuses), OverallStatus::Breaking);
        }

        #[test]
        fn prop_order_does_not_matter(statuses in proptest::collection::vec(status(), 0..16)) {
            let forward = OverallStatus::from_statuses(statuses.iter().copied());
            let backward = OverallStatus::from_statuses(statuses.iter().rev().copied());
            prop_assert_eq!(forward, backward);
        }
    }
}
