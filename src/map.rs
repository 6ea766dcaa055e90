use core::borrow::Borrow;
use core::cmp::Ordering;

use crate::Blackwood;

#[derive(Debug, Clone)]
struct MapEntry<K, V> {
    key: K,
    value: V,
}

impl<K: Ord, V> PartialEq for MapEntry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Ord, V> Eq for MapEntry<K, V> {}

impl<K: Ord, V> PartialOrd for MapEntry<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, V> Ord for MapEntry<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl<K, V> Borrow<K> for MapEntry<K, V> {
    fn borrow(&self) -> &K {
        &self.key
    }
}

/// An associative array, storing key-value pairs.
///
/// Uses a Blackwood red-black tree whose entries are ordered by key alone, so the balancing
/// code never looks at the values.
#[derive(Debug, Clone)]
pub struct BlackwoodMap<K, V> {
    tree: Blackwood<MapEntry<K, V>>,
}

impl<K: Ord, V> BlackwoodMap<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: Blackwood::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: Blackwood::with_capacity(capacity),
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Stores the pair unless `key` is already present, in which case the existing value is
    /// kept and `false` is returned.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.tree.insert(MapEntry { key, value }).is_inserted()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.get(key).map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.tree.get_mut(key).map(|entry| &mut entry.value)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.tree.take(key).map(|entry| entry.value)
    }

    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|entry| (&entry.key, &entry.value))
    }

    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|entry| (&entry.key, &entry.value))
    }

    /// Pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.tree.iter().map(|entry| (&entry.key, &entry.value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.tree.iter().map(|entry| &entry.key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.tree.iter().map(|entry| &entry.value)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.tree.is_valid()
    }
}

impl<K: Ord, V> Default for BlackwoodMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for BlackwoodMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
