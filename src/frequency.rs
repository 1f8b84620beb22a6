use ahash::AHashMap as HashMap;

/// Occurrence counts for each distinct byte of an input.
///
/// Built once per compression call and not modified afterward, except when
/// partial tables are merged while counting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<u8, u64>,
}

impl FrequencyTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every byte of `input` in a single pass.
    pub fn count(input: &[u8]) -> Self {
        let mut table = Self::new();
        for &byte in input {
            *table.counts.entry(byte).or_insert(0) += 1;
        }
        table
    }

    /// Counts `input` in `chunk_len`-sized pieces on the rayon pool and merges
    /// the partial tables. Equivalent to [`FrequencyTable::count`].
    #[cfg(feature = "rayon")]
    pub fn count_parallel(input: &[u8], chunk_len: usize) -> Self {
        use rayon::prelude::*;

        input
            .par_chunks(chunk_len.max(1))
            .map(Self::count)
            .reduce(Self::new, |mut acc, part| {
                acc.merge(&part);
                acc
            })
    }

    /// Adds the counts of `other` into `self`.
    pub fn merge(&mut self, other: &FrequencyTable) {
        for (&symbol, &count) in other.counts.iter() {
            *self.counts.entry(symbol).or_insert(0) += count;
        }
    }

    /// Returns the count for `symbol`, or 0 if it never occurred.
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the length of the counted input.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Returns `(symbol, count)` pairs in ascending symbol order.
    ///
    /// The hash map has no stable iteration order, so anything that must be
    /// reproducible (tree construction, display) goes through this.
    pub fn sorted(&self) -> Vec<(u8, u64)> {
        let mut entries: Vec<(u8, u64)> = self
            .counts
            .iter()
            .map(|(&symbol, &count)| (symbol, count))
            .collect();
        entries.sort_unstable_by_key(|&(symbol, _)| symbol);
        entries
    }
}

impl FromIterator<(u8, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (u8, u64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (symbol, count) in iter {
            *table.counts.entry(symbol).or_insert(0) += count;
        }
        table
    }
}
