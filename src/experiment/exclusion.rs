//! Exclusion Policy - combinations too expensive to run

use std::collections::HashSet;

/// A fixed set of `(problem_idx, method_idx)` cells that are never executed.
///
/// Cells land here when their observed running time exceeds the operational
/// budget (minutes, not seconds). Excluded cells are recorded with the
/// sentinel placeholder instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    cells: HashSet<(usize, usize)>,
}

impl ExclusionSet {
    /// An empty set: every cell runs.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether the cell is excluded.
    #[must_use]
    pub fn is_excluded(&self, problem_idx: usize, method_idx: usize) -> bool {
        self.cells.contains(&(problem_idx, method_idx))
    }

    /// Number of excluded cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether nothing is excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(usize, usize)> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let set: ExclusionSet = [(1, 1), (2, 3)].into_iter().collect();
        assert!(set.is_excluded(1, 1));
        assert!(set.is_excluded(2, 3));
        assert!(!set.is_excluded(3, 2));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_none_excludes_nothing() {
        let set = ExclusionSet::none();
        assert!(set.is_empty());
        assert!(!set.is_excluded(0, 0));
    }
}
