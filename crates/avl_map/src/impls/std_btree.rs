use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::OrderedMap;

/// `std` B-tree behind the same interface, used as the reference and baseline.
pub struct StdBTreeMap<K: Ord, V> {
    inner: BTreeMap<K, V>,
}

impl<K: Ord, V> StdBTreeMap<K, V> {
    pub fn into_inner(self) -> BTreeMap<K, V> {
        self.inner
    }
}

impl<K: Ord, V> OrderedMap for StdBTreeMap<K, V> {
    type Key = K;
    type Value = V;

    fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn get(&self, key: &Self::Key) -> Option<&Self::Value> {
        self.inner.get(key)
    }

    fn insert(&mut self, key: Self::Key, value: Self::Value) -> bool {
        match self.inner.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    fn remove(&mut self, key: &Self::Key) -> Option<Self::Value> {
        self.inner.remove(key)
    }

    fn lower_bound(&self, key: &Self::Key) -> Option<(&Self::Key, &Self::Value)> {
        self.inner.range(key..).next()
    }
}
