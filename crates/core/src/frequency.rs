//! Symbol frequency tallying.

use crate::symbol::Symbol;
use std::collections::BTreeMap;

/// Occurrence count per symbol.
///
/// Backed by an ordered map so iteration always runs in ascending symbol
/// order; the tree builder relies on that for reproducible codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<S: Symbol> {
    counts: BTreeMap<S, u64>,
}

impl<S: Symbol> FrequencyTable<S> {
    /// Count every symbol of `stream` in a single pass.
    pub fn tally<I>(stream: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let mut counts = BTreeMap::new();
        for symbol in stream {
            *counts.entry(symbol).or_insert(0u64) += 1;
        }
        Self { counts }
    }

    pub fn get(&self, symbol: &S) -> u64 {
        self.counts.get(symbol).copied().unwrap_or(0)
    }

    /// Number of distinct symbols seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the length of the tallied stream.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate `(symbol, count)` in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (S, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }
}

impl<S: Symbol> FromIterator<(S, u64)> for FrequencyTable<S> {
    /// Build from explicit counts; zero counts are dropped.
    fn from_iter<T: IntoIterator<Item = (S, u64)>>(iter: T) -> Self {
        let mut counts = BTreeMap::new();
        for (symbol, count) in iter.into_iter().filter(|&(_, count)| count > 0) {
            *counts.entry(symbol).or_insert(0) += count;
        }
        Self { counts }
    }
}
