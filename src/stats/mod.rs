//! Size statistics by content class.
//!
//! [`SizeBreakdown`] aggregates member counts and byte totals per
//! [`Category`]. The text and binary subtotals reported by
//! [`ModelInfo`](crate::ModelInfo) come from here.

use std::collections::BTreeMap;

use crate::container::{Category, Member};

/// Count and byte total for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    /// Number of members in the category.
    pub members: usize,
    /// Sum of their uncompressed sizes.
    pub bytes: u64,
}

/// Per-category size breakdown of a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeBreakdown {
    totals: BTreeMap<Category, CategoryTotals>,
}

impl SizeBreakdown {
    /// Aggregates a member listing.
    pub fn from_members(members: &[Member]) -> Self {
        let mut breakdown = Self::default();
        for member in members {
            breakdown.record(member.category, member.size_bytes);
        }
        breakdown
    }

    /// Adds one member of `category` with `bytes` to the totals.
    pub fn record(&mut self, category: Category, bytes: u64) {
        let entry = self.totals.entry(category).or_default();
        entry.members += 1;
        entry.bytes = entry.bytes.saturating_add(bytes);
    }

    /// Returns the totals for `category` (zero if no member fell into it).
    pub fn get(&self, category: Category) -> CategoryTotals {
        self.totals.get(&category).copied().unwrap_or_default()
    }

    /// Iterates over non-empty categories in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, CategoryTotals)> + '_ {
        self.totals.iter().map(|(category, totals)| (*category, *totals))
    }

    /// Total number of members.
    pub fn member_count(&self) -> usize {
        self.totals.values().map(|t| t.members).sum()
    }

    /// Sum of all member sizes.
    pub fn total_bytes(&self) -> u64 {
        self.sum_where(|_| true)
    }

    /// Sum of configuration, metadata and text-data members.
    pub fn text_bytes(&self) -> u64 {
        self.sum_where(Category::is_text)
    }

    /// Sum of simulation-data members.
    pub fn binary_bytes(&self) -> u64 {
        self.sum_where(Category::is_binary)
    }

    fn sum_where(&self, predicate: impl Fn(Category) -> bool) -> u64 {
        self.totals
            .iter()
            .filter(|(category, _)| predicate(**category))
            .fold(0u64, |acc, (_, t)| acc.saturating_add(t.bytes))
    }
}
