//! Row presentation state
//!
//! Tracks which report rows are shown expanded. Indices only mean something
//! for the report they were taken against, so the set is reset every time the
//! held report changes.

use std::collections::BTreeSet;

/// Set of expanded row indices for the current report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionSet {
    expanded: BTreeSet<usize>,
    row_count: usize,
}

impl ExpansionSet {
    /// Creates an empty set for a report of `row_count` rows
    pub fn new(row_count: usize) -> Self {
        Self {
            expanded: BTreeSet::new(),
            row_count,
        }
    }

    /// Clears the set and adopts a new row count
    pub fn reset(&mut self, row_count: usize) {
        self.expanded.clear();
        self.row_count = row_count;
    }

    /// Flips membership of `index`
    ///
    /// Returns whether the row is expanded afterwards. Out-of-range indices are
    /// ignored and return false.
    pub fn toggle(&mut self, index: usize) -> bool {
        if index >= self.row_count {
            tracing::debug!(
                "Ignoring toggle of row {} (report has {} rows)",
                index,
                self.row_count
            );
            return false;
        }

        if self.expanded.remove(&index) {
            false
        } else {
            self.expanded.insert(index);
            true
        }
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains(&index)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Expanded indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.expanded.iter().copied()
    }
}
