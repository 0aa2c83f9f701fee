//! Token allocation
//!
//! The first round asks the user to distribute a fixed budget of 100 tokens
//! across the eight [`Category`] buckets. [`AllocationTracker`] owns that
//! distribution and enforces two invariants:
//!
//! - `allocated() + remaining() == TOTAL_BUDGET` at all times
//! - every category value is non-negative
//!
//! A change that would break either invariant is rejected as a silent no-op.
//! A UI is expected to pin each control to [`AllocationTracker::max_for`] so
//! that rejections only happen on stray input.

use sdk::errors::EngineError;
use sdk::types::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Fixed number of tokens to distribute
pub const TOTAL_BUDGET: u32 = 100;

/// Read-only copy of category values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allocation {
    values: BTreeMap<Category, u32>,
}

impl Allocation {
    /// Value for a category; categories never set read as 0
    pub fn get(&self, category: Category) -> u32 {
        self.values.get(&category).copied().unwrap_or(0)
    }

    /// Sum of all category values
    pub fn total(&self) -> u32 {
        self.values.values().sum()
    }

    /// Value as `f64`, for scoring arithmetic
    pub(crate) fn as_f64(&self, category: Category) -> f64 {
        f64::from(self.get(category))
    }

    /// Build an allocation from `key=value` pairs by replaying them through
    /// an [`AllocationTracker`]
    ///
    /// Unlike interactive input, a pair that the budget rule rejects is an
    /// error here, since there is no control to pin the range.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tracker = AllocationTracker::new();
        for pair in pairs {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                EngineError::InvalidAllocation(format!("expected key=value, got '{}'", pair))
            })?;
            let category: Category = key.parse()?;
            let value: i64 = value.trim().parse().map_err(|_| {
                EngineError::InvalidAllocation(format!("'{}' is not an integer", value.trim()))
            })?;
            if !tracker.set_category(category, value) {
                return Err(EngineError::InvalidAllocation(format!(
                    "{}={} exceeds the remaining budget of {}",
                    category,
                    value,
                    tracker.max_for(category)
                )));
            }
        }
        Ok(tracker.snapshot())
    }
}

/// Fixed-budget distribution across the eight categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationTracker {
    values: [u32; 8],
    remaining: u32,
}

impl AllocationTracker {
    /// All categories at 0, full budget remaining
    pub fn new() -> Self {
        Self {
            values: [0; 8],
            remaining: TOTAL_BUDGET,
        }
    }

    /// Set a category to `new_value`
    ///
    /// Applies only if `new_value` is non-negative and the change fits in the
    /// remaining budget. Returns whether the change was applied; on `false`
    /// nothing was modified.
    pub fn set_category(&mut self, category: Category, new_value: i64) -> bool {
        // remaining - (new - current) == (remaining + current) - new
        let available = self.max_for(category);
        let accepted = u32::try_from(new_value)
            .ok()
            .and_then(|value| available.checked_sub(value).map(|rest| (value, rest)));

        let Some((value, remaining_after)) = accepted else {
            debug!(
                category = %category,
                requested = new_value,
                remaining = self.remaining,
                "Allocation change rejected"
            );
            return false;
        };

        self.values[category.index()] = value;
        self.remaining = remaining_after;
        debug!(
            category = %category,
            value = new_value,
            remaining = self.remaining,
            "Allocation updated"
        );
        true
    }

    pub fn value(&self, category: Category) -> u32 {
        self.values[category.index()]
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Tokens currently placed
    pub fn allocated(&self) -> u32 {
        self.values.iter().sum()
    }

    /// Highest value `category` can be set to right now
    pub fn max_for(&self, category: Category) -> u32 {
        self.value(category) + self.remaining
    }

    /// The budget is fully spent; the only gate out of the allocation round
    pub fn can_advance(&self) -> bool {
        self.remaining == 0
    }

    pub fn snapshot(&self) -> Allocation {
        Allocation {
            values: Category::ALL
                .into_iter()
                .map(|c| (c, self.value(c)))
                .collect(),
        }
    }
}

impl Default for AllocationTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let tracker = AllocationTracker::new();
        assert_eq!(tracker.remaining(), TOTAL_BUDGET);
        assert_eq!(tracker.allocated(), 0);
        assert!(!tracker.can_advance());
        for category in Category::ALL {
            assert_eq!(tracker.value(category), 0);
        }
    }

    #[test]
    fn test_set_within_budget() {
        let mut tracker = AllocationTracker::new();
        assert!(tracker.set_category(Category::Speed, 40));
        assert_eq!(tracker.value(Category::Speed), 40);
        assert_eq!(tracker.remaining(), 60);
    }

    #[test]
    fn test_overdraw_rejected() {
        let mut tracker = AllocationTracker::new();
        assert!(tracker.set_category(Category::Speed, 70));
        let before = tracker.clone();

        assert!(!tracker.set_category(Category::Quality, 31));
        assert_eq!(tracker, before);

        assert!(tracker.set_category(Category::Quality, 30));
        assert!(tracker.can_advance());
    }

    #[test]
    fn test_negative_rejected() {
        let mut tracker = AllocationTracker::new();
        tracker.set_category(Category::Bench, 10);
        let before = tracker.clone();

        assert!(!tracker.set_category(Category::Bench, -1));
        assert_eq!(tracker, before);
    }

    #[test]
    fn test_revisit_lowers_and_frees_budget() {
        let mut tracker = AllocationTracker::new();
        tracker.set_category(Category::Comp, 100);
        assert!(tracker.can_advance());

        assert!(tracker.set_category(Category::Comp, 20));
        assert_eq!(tracker.remaining(), 80);
        assert!(!tracker.can_advance());

        assert!(tracker.set_category(Category::Clarity, 80));
        assert!(tracker.can_advance());
    }

    #[test]
    fn test_max_for() {
        let mut tracker = AllocationTracker::new();
        tracker.set_category(Category::Speed, 30);
        tracker.set_category(Category::Change, 50);
        assert_eq!(tracker.max_for(Category::Speed), 50);
        assert_eq!(tracker.max_for(Category::Customer), 20);
    }

    #[test]
    fn test_set_same_value_is_accepted_noop() {
        let mut tracker = AllocationTracker::new();
        tracker.set_category(Category::Rituals, 100);
        assert!(tracker.set_category(Category::Rituals, 100));
        assert_eq!(tracker.remaining(), 0);
    }

    #[test]
    fn test_snapshot_has_every_category() {
        let mut tracker = AllocationTracker::new();
        tracker.set_category(Category::Customer, 15);
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.get(Category::Customer), 15);
        assert_eq!(snapshot.get(Category::Speed), 0);
        assert_eq!(snapshot.total(), 15);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 8);
        assert_eq!(json["customer"], 15);
    }

    #[test]
    fn test_from_pairs() {
        let allocation = Allocation::from_pairs(["speed=50", "customer = 50"]).unwrap();
        assert_eq!(allocation.get(Category::Speed), 50);
        assert_eq!(allocation.get(Category::Customer), 50);
        assert_eq!(allocation.total(), 100);
    }

    #[test]
    fn test_from_pairs_errors() {
        assert!(matches!(
            Allocation::from_pairs(["speed"]).unwrap_err(),
            EngineError::InvalidAllocation(_)
        ));
        assert!(matches!(
            Allocation::from_pairs(["velocity=10"]).unwrap_err(),
            EngineError::UnknownCategory(_)
        ));
        assert!(matches!(
            Allocation::from_pairs(["speed=ten"]).unwrap_err(),
            EngineError::InvalidAllocation(_)
        ));
        assert!(matches!(
            Allocation::from_pairs(["speed=60", "bench=50"]).unwrap_err(),
            EngineError::InvalidAllocation(_)
        ));
    }
}
