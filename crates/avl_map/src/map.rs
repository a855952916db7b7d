use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Bound, Index, RangeBounds};

use crate::compare::{Comparator, EntryOrder, Natural};
use crate::error::MapError;
use crate::iter::{IntoIter, Iter, IterMut, Keys, Range, Values, ValuesMut};
use crate::position::{Position, RevPosition};
use crate::raw::{Id, MAX_SLOTS, RawTree};

/// Ordered map backed by an AVL tree.
///
/// Keys are unique and arranged by the comparator `C`. Entry handles
/// ([`Position`]) survive insertions and erasure of other entries.
pub struct AvlMap<K, V, C = Natural> {
    tree: RawTree<K, V>,
    cmp: C,
}

impl<K: Ord, V> AvlMap<K, V> {
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K, V, C> AvlMap<K, V, C> {
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Number of entries the map can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    /// Largest number of entries a map can index.
    pub fn max_len(&self) -> usize {
        MAX_SLOTS - 1
    }

    pub fn reserve(&mut self, additional: usize) {
        self.tree.reserve(additional);
    }

    pub fn try_reserve(&mut self, additional: usize) -> Result<(), MapError> {
        Ok(self.tree.try_reserve(additional)?)
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Orders `(key, value)` entries by key under this map's comparator.
    pub fn value_comparator(&self) -> EntryOrder<'_, C> {
        EntryOrder::new(&self.cmp)
    }

    /// Drops every entry. Allocated capacity is kept.
    pub fn clear(&mut self) {
        tracing::debug!(len = self.len(), "clearing map");
        self.tree.clear();
    }

    /// Exchanges the contents (and comparators) of two maps without touching nodes.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    fn position(&self, x: Id) -> Position {
        if x.is_sentinel() {
            Position::end()
        } else {
            Position::new(x, self.tree.generation(x))
        }
    }

    fn resolve(&self, pos: Position) -> Option<Id> {
        self.tree
            .is_current(pos.id, pos.generation)
            .then_some(pos.id)
    }

    fn expect_live(&self, pos: Position) -> Id {
        match self.resolve(pos) {
            Some(x) => x,
            None => panic!("{pos:?} does not refer to an entry of this map"),
        }
    }

    /// Position of the smallest entry, or [`end`](Self::end) when empty.
    pub fn begin(&self) -> Position {
        self.position(self.tree.first())
    }

    /// The end marker: one past the largest entry.
    pub fn end(&self) -> Position {
        Position::end()
    }

    pub fn rbegin(&self) -> RevPosition {
        RevPosition::new(self.end())
    }

    pub fn rend(&self) -> RevPosition {
        RevPosition::new(self.begin())
    }

    /// Position after `pos`. Stepping from the end marker wraps to the first entry.
    ///
    /// # Panics
    ///
    /// Panics if the entry at `pos` has been erased.
    pub fn next_position(&self, pos: Position) -> Position {
        let x = self.expect_live(pos);
        self.position(self.tree.successor(x))
    }

    /// Position before `pos`. Stepping back from the end marker gives the last entry.
    ///
    /// # Panics
    ///
    /// Panics if the entry at `pos` has been erased.
    pub fn prev_position(&self, pos: Position) -> Position {
        let x = self.expect_live(pos);
        self.position(self.tree.predecessor(x))
    }

    /// Advances a reverse position towards smaller keys.
    ///
    /// # Panics
    ///
    /// Panics if the base entry has been erased.
    pub fn next_rev(&self, pos: RevPosition) -> RevPosition {
        RevPosition::new(self.prev_position(pos.base()))
    }

    /// Moves a reverse position back towards larger keys.
    ///
    /// # Panics
    ///
    /// Panics if the base entry has been erased.
    pub fn prev_rev(&self, pos: RevPosition) -> RevPosition {
        RevPosition::new(self.next_position(pos.base()))
    }

    /// Entry at `pos`; `None` for the end marker or an erased entry.
    pub fn entry_at(&self, pos: Position) -> Option<(&K, &V)> {
        let x = self.resolve(pos)?;
        if x.is_sentinel() {
            return None;
        }
        let (key, value) = self.tree.entry(x);
        Some((key, value))
    }

    pub fn value_at_mut(&mut self, pos: Position) -> Option<&mut V> {
        let x = self.resolve(pos)?;
        if x.is_sentinel() {
            return None;
        }
        Some(&mut self.tree.entry_mut(x).1)
    }

    /// Entry just before the base of `pos`.
    pub fn entry_at_rev(&self, pos: RevPosition) -> Option<(&K, &V)> {
        let base = self.resolve(pos.base())?;
        let x = self.tree.predecessor(base);
        if x.is_sentinel() {
            return None;
        }
        let (key, value) = self.tree.entry(x);
        Some((key, value))
    }

    /// Removes the entry at `pos`. The end marker and erased entries yield `None`.
    pub fn erase_at(&mut self, pos: Position) -> Option<(K, V)> {
        let x = self.resolve(pos)?;
        if x.is_sentinel() {
            return None;
        }
        Some(self.tree.erase(x))
    }

    /// Keeps only the entries for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut x = self.tree.first();
        while !x.is_sentinel() {
            let next = self.tree.successor(x);
            let (key, value) = self.tree.entry_mut(x);
            if !keep(key, value) {
                self.tree.erase(x);
            }
            x = next;
        }
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let x = self.tree.first();
        (!x.is_sentinel()).then(|| self.tree.erase(x))
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let x = self.tree.last();
        (!x.is_sentinel()).then(|| self.tree.erase(x))
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.entry_at(self.begin())
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.entry_at_rev(self.rbegin())
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.tree)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.tree)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut(self.iter_mut())
    }
}

impl<K, V, C: Comparator<K>> AvlMap<K, V, C> {
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            tree: RawTree::new(),
            cmp,
        }
    }

    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        Self {
            tree: RawTree::with_capacity(capacity),
            cmp,
        }
    }

    /// Builds a map from `entries`; on duplicate keys the first entry wins.
    pub fn from_entries_with<I>(entries: I, cmp: C) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::with_comparator(cmp);
        map.insert_all(entries);
        map
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.search(key, &self.cmp).is_some()
    }

    /// Position of `key`, or the end marker when absent.
    pub fn find(&self, key: &K) -> Position {
        match self.tree.search(key, &self.cmp) {
            Some(x) => self.position(x),
            None => self.end(),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, value)| value)
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let x = self.tree.search(key, &self.cmp)?;
        let (key, value) = self.tree.entry(x);
        Some((key, value))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let x = self.tree.search(key, &self.cmp)?;
        Some(&mut self.tree.entry_mut(x).1)
    }

    /// Checked access.
    pub fn at(&self, key: &K) -> Result<&V, MapError> {
        self.get(key).ok_or(MapError::KeyNotFound)
    }

    pub fn at_mut(&mut self, key: &K) -> Result<&mut V, MapError> {
        self.get_mut(key).ok_or(MapError::KeyNotFound)
    }

    /// Value for `key`, inserting `V::default()` first when the key is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let x = match self.tree.search(&key, &self.cmp) {
            Some(x) => x,
            None => self.tree.insert(key, V::default(), &self.cmp).0,
        };
        &mut self.tree.entry_mut(x).1
    }

    /// Inserts `(key, value)` unless the key is already present.
    ///
    /// Returns the position of the entry holding `key` and whether it was newly
    /// inserted. An existing value is never overwritten.
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        let (x, inserted) = self.tree.insert(key, value, &self.cmp);
        (self.position(x), inserted)
    }

    /// Like [`insert`](Self::insert), but reports allocation failure instead of
    /// aborting. On failure the map is unchanged.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(Position, bool), MapError> {
        let (x, inserted) = self.tree.try_insert(key, value, &self.cmp)?;
        Ok((self.position(x), inserted))
    }

    /// Inserts using `hint` as the position the new entry should precede.
    ///
    /// A correct hint skips the search from the root. A wrong or stale hint is
    /// ignored. Returns the position of the entry holding `key`.
    pub fn insert_hint(&mut self, hint: Position, key: K, value: V) -> Position {
        let (x, _) = match self.resolve(hint) {
            Some(hint) => self.tree.insert_hinted(hint, key, value, &self.cmp),
            None => self.tree.insert(key, value, &self.cmp),
        };
        self.position(x)
    }

    pub fn insert_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.insert_hint(self.end(), key, value);
        }
    }

    /// Removes `key`, returning how many entries were removed (0 or 1).
    pub fn erase(&mut self, key: &K) -> usize {
        usize::from(self.remove_entry(key).is_some())
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let x = self.tree.search(key, &self.cmp)?;
        Some(self.tree.erase(x))
    }

    /// First entry whose key is not ordered before `key`.
    pub fn lower_bound(&self, key: &K) -> Position {
        self.position(self.tree.lower_bound(key, &self.cmp))
    }

    /// First entry whose key is ordered after `key`.
    pub fn upper_bound(&self, key: &K) -> Position {
        self.position(self.tree.upper_bound(key, &self.cmp))
    }

    /// `[lower_bound(key), upper_bound(key))`, holding at most one entry.
    pub fn equal_range(&self, key: &K) -> (Position, Position) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Entries whose keys fall in `range`.
    ///
    /// An inverted range yields nothing.
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> Range<'_, K, V> {
        let front = match range.start_bound() {
            Bound::Included(key) => self.tree.lower_bound(key, &self.cmp),
            Bound::Excluded(key) => self.tree.upper_bound(key, &self.cmp),
            Bound::Unbounded => self.tree.first(),
        };
        let back = match range.end_bound() {
            Bound::Included(key) => self.tree.upper_bound(key, &self.cmp),
            Bound::Excluded(key) => self.tree.lower_bound(key, &self.cmp),
            Bound::Unbounded => Id::SENTINEL,
        };
        self.span(front, back)
    }

    /// Entries in `[first, last)`. If `first` comes after `last`, yields nothing.
    ///
    /// # Panics
    ///
    /// Panics if either position refers to an erased entry.
    pub fn range_between(&self, first: Position, last: Position) -> Range<'_, K, V> {
        let front = self.expect_live(first);
        let back = self.expect_live(last);
        self.span(front, back)
    }

    /// Removes every entry in `[first, last)` and returns how many were removed.
    /// If `first` comes after `last`, nothing is removed.
    ///
    /// # Panics
    ///
    /// Panics if either position refers to an erased entry.
    pub fn erase_range(&mut self, first: Position, last: Position) -> usize {
        let last = self.expect_live(last);
        let mut x = self.expect_live(first);
        if self.is_inverted(x, last) {
            return 0;
        }
        let mut removed = 0;
        while x != last && !x.is_sentinel() {
            let next = self.tree.successor(x);
            self.tree.erase(x);
            removed += 1;
            x = next;
        }
        tracing::debug!(removed, "erased range");
        removed
    }

    /// Whether `front` sorts after `back`. The end marker sorts after every entry.
    fn is_inverted(&self, front: Id, back: Id) -> bool {
        if front.is_sentinel() {
            return !back.is_sentinel();
        }
        back.is_node()
            && self.cmp.compare(self.tree.key(front), self.tree.key(back)) == Ordering::Greater
    }

    fn span(&self, front: Id, back: Id) -> Range<'_, K, V> {
        if self.is_inverted(front, back) {
            return Range::empty(&self.tree);
        }
        Range::new(&self.tree, front, back)
    }
}

impl<K: Ord, V> Default for AvlMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Rebuilds the copy by re-inserting every entry in ascending order.
impl<K: Clone, V: Clone, C: Comparator<K> + Clone> Clone for AvlMap<K, V, C> {
    fn clone(&self) -> Self {
        let mut map = Self::with_capacity_and_comparator(self.len(), self.cmp.clone());
        for (key, value) in self {
            map.tree
                .insert_hinted(Id::SENTINEL, key.clone(), value.clone(), &map.cmp);
        }
        map
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for AvlMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for AvlMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for AvlMap<K, V, C> {}

impl<K: PartialOrd, V: PartialOrd, C> PartialOrd for AvlMap<K, V, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord, C> Ord for AvlMap<K, V, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: Hash, V: Hash, C> Hash for AvlMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for entry in self {
            entry.hash(state);
        }
    }
}

impl<K, V, C: Comparator<K>> Index<&K> for AvlMap<K, V, C> {
    type Output = V;

    /// # Panics
    ///
    /// Panics if `key` is not present.
    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not found"),
        }
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for AvlMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries_with(iter, C::default())
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for AvlMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        Self::from_entries_with(entries, Natural)
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for AvlMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

impl<'a, K, V, C> IntoIterator for &'a AvlMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut AvlMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, C> IntoIterator for AvlMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.tree)
    }
}

#[cfg(test)]
impl<K, V, C: Comparator<K>> AvlMap<K, V, C> {
    pub(crate) fn check(&self) -> u8 {
        self.tree.check(&self.cmp)
    }

    pub(crate) fn root_key(&self) -> Option<&K> {
        let root = self.tree.root();
        (!root.is_sentinel()).then(|| self.tree.key(root))
    }
}
