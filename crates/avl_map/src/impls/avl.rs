use crate::{AvlMap, Natural, OrderedMap};

impl<K: Ord, V> OrderedMap for AvlMap<K, V, Natural> {
    type Key = K;
    type Value = V;

    fn new() -> Self {
        AvlMap::new()
    }

    fn len(&self) -> usize {
        AvlMap::len(self)
    }

    fn get(&self, key: &Self::Key) -> Option<&Self::Value> {
        AvlMap::get(self, key)
    }

    fn insert(&mut self, key: Self::Key, value: Self::Value) -> bool {
        AvlMap::insert(self, key, value).1
    }

    fn remove(&mut self, key: &Self::Key) -> Option<Self::Value> {
        AvlMap::remove(self, key)
    }

    fn lower_bound(&self, key: &Self::Key) -> Option<(&Self::Key, &Self::Value)> {
        let pos = AvlMap::lower_bound(self, key);
        self.entry_at(pos)
    }
}
