use std::{
    borrow::Borrow,
    collections::{hash_map, HashMap},
    hash::Hash,
    ops::Index,
};

const ZERO: f64 = 0.0;

/// A sparse mapping from keys to real values where every absent key reads as `0.0`
///
/// Reads never insert. Only keys that have been written are stored, and iteration visits
/// those keys alone, so the full key universe (every state-action pair, every feature name)
/// is never materialized.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMap<K: Eq + Hash> {
    entries: HashMap<K, f64>,
}

impl<K: Eq + Hash> Default for SparseMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> SparseMap<K> {
    /// The value read for any key that has not been written
    pub const DEFAULT: f64 = ZERO;

    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Read the value for `key`, or [`DEFAULT`](Self::DEFAULT) if it is absent
    pub fn get<Q>(&self, key: &Q) -> f64
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.get(key).copied().unwrap_or(Self::DEFAULT)
    }

    /// Overwrite the value for `key`
    pub fn set(&mut self, key: K, value: f64) {
        self.entries.insert(key, value);
    }

    /// Add `delta` to the value for `key`, starting from the default if absent
    pub fn add(&mut self, key: K, delta: f64) {
        *self.entries.entry(key).or_insert(Self::DEFAULT) += delta;
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Number of explicitly stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, K, f64> {
        self.entries.iter()
    }

    pub fn keys(&self) -> hash_map::Keys<'_, K, f64> {
        self.entries.keys()
    }

    /// Sum of `self[k] * other[k]` over the keys stored in `self`
    ///
    /// Iterate over the sparser operand: keys missing from `other` contribute nothing.
    pub fn dot(&self, other: &Self) -> f64 {
        self.entries.iter().map(|(k, v)| other.get(k) * v).sum()
    }

    /// Divide every stored value by `divisor`
    pub fn divide_all(&mut self, divisor: f64) {
        self.entries.values_mut().for_each(|v| *v /= divisor);
    }
}

impl<K: Eq + Hash, Q> Index<&Q> for SparseMap<K>
where
    K: Borrow<Q>,
    Q: Eq + Hash + ?Sized,
{
    type Output = f64;

    fn index(&self, key: &Q) -> &Self::Output {
        self.entries.get(key).unwrap_or(&ZERO)
    }
}

impl<K: Eq + Hash> FromIterator<(K, f64)> for SparseMap<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a, K: Eq + Hash> IntoIterator for &'a SparseMap<K> {
    type Item = (&'a K, &'a f64);
    type IntoIter = hash_map::Iter<'a, K, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
