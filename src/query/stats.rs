//! Small aggregation helpers shared by the queries.

use std::collections::HashMap;
use std::hash::Hash;

/// Arithmetic mean; `None` for no values.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0_usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Sample standard deviation (n - 1 denominator); `None` for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values.iter().copied())?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

// ---------------------------------------------------------------------------
// Groups – group-by that remembers first-seen order
// ---------------------------------------------------------------------------

/// Accumulators keyed by group, iterated in the order keys were first seen.
///
/// First-seen order is what breaks ties in every "top" query.
#[derive(Debug, Clone)]
pub struct Groups<K, A> {
    index: HashMap<K, usize>,
    entries: Vec<(K, A)>,
}

impl<K: Hash + Eq + Clone, A: Default> Groups<K, A> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// The accumulator for `key`, created on first use.
    pub fn entry(&mut self, key: K) -> &mut A {
        let pos = match self.index.get(&key) {
            Some(&pos) => pos,
            None => {
                self.entries.push((key.clone(), A::default()));
                self.index.insert(key, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[pos].1
    }

    pub fn get(&self, key: &K) -> Option<&A> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &A)> {
        self.entries.iter().map(|(k, a)| (k, a))
    }

    pub fn into_vec(self) -> Vec<(K, A)> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Hash + Eq + Clone, A: Default> Default for Groups<K, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Running sum and count; the mean of nothing is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeanAcc {
    sum: f64,
    n: usize,
}

impl MeanAcc {
    pub fn add(&mut self, v: f64) {
        self.sum += v;
        self.n += 1;
    }

    /// Add `v` if present.
    pub fn add_opt(&mut self, v: Option<f64>) {
        if let Some(v) = v {
            self.add(v);
        }
    }

    pub fn count(&self) -> usize {
        self.n
    }

    pub fn mean(&self) -> Option<f64> {
        (self.n > 0).then(|| self.sum / self.n as f64)
    }
}

/// First item with the strictly greatest key; later equal keys lose. Items whose key is
/// NaN or infinite never win.
pub fn first_max_by<T>(items: impl IntoIterator<Item = T>, key: impl Fn(&T) -> f64) -> Option<T> {
    let mut best: Option<(f64, T)> = None;
    for item in items {
        let k = key(&item);
        if !k.is_finite() {
            continue;
        }
        match &best {
            Some((bk, _)) if k <= *bk => {}
            _ => best = Some((k, item)),
        }
    }
    best.map(|(_, item)| item)
}

/// Stable sort by descending count, keep the first `k`.
pub fn top_k_by_count<K>(mut counts: Vec<(K, usize)>, k: usize) -> Vec<(K, usize)> {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(k);
    counts
}
