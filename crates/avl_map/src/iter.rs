use std::iter::FusedIterator;

use crate::raw::{Id, RawTree};

/// Entries of a half-open node range `[front, back)`, in ascending key order.
///
/// Walks successor links from the front and predecessor links from the back.
pub struct Range<'a, K, V> {
    tree: &'a RawTree<K, V>,
    front: Id,
    back: Id,
}

impl<'a, K, V> Range<'a, K, V> {
    /// `front` must not come after `back` in key order.
    pub(crate) fn new(tree: &'a RawTree<K, V>, front: Id, back: Id) -> Self {
        Self { tree, front, back }
    }

    pub(crate) fn empty(tree: &'a RawTree<K, V>) -> Self {
        Self::new(tree, Id::SENTINEL, Id::SENTINEL)
    }

    fn exhausted(&self) -> bool {
        self.front == self.back || self.front.is_sentinel()
    }
}

impl<K, V> Clone for Range<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted() {
            return None;
        }
        let x = self.front;
        self.front = self.tree.successor(x);
        let (key, value) = self.tree.entry(x);
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted() {
            (0, Some(0))
        } else {
            (1, Some(self.tree.len()))
        }
    }
}

impl<K, V> DoubleEndedIterator for Range<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.exhausted() {
            return None;
        }
        let x = self.tree.predecessor(self.back);
        if x.is_sentinel() {
            return None;
        }
        self.back = x;
        let (key, value) = self.tree.entry(x);
        Some((key, value))
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

/// Every entry of a map, in ascending key order.
pub struct Iter<'a, K, V> {
    range: Range<'a, K, V>,
    length: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(tree: &'a RawTree<K, V>) -> Self {
        Self {
            range: Range::new(tree, tree.first(), Id::SENTINEL),
            length: tree.len(),
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            range: self.range.clone(),
            length: self.length,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.length == 0 {
            return None;
        }
        self.length -= 1;
        self.range.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.length, Some(self.length))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.length == 0 {
            return None;
        }
        self.length -= 1;
        self.range.next_back()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

pub struct Keys<'a, K, V>(pub(crate) Iter<'a, K, V>);

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

pub struct Values<'a, K, V>(pub(crate) Iter<'a, K, V>);

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

/// Mutable entries in ascending key order. Keys stay read-only.
pub struct IterMut<'a, K, V> {
    slots: Vec<Option<&'a mut (K, V)>>,
    order: std::vec::IntoIter<Id>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(tree: &'a mut RawTree<K, V>) -> Self {
        let order = tree.in_order().into_iter();
        let slots = tree.slots_mut().collect();
        Self { slots, order }
    }

    fn take(&mut self, x: Id) -> Option<(&'a K, &'a mut V)> {
        let (key, value) = self.slots[x.idx()].take()?;
        Some((&*key, value))
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let x = self.order.next()?;
        self.take(x)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let x = self.order.next_back()?;
        self.take(x)
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

pub struct ValuesMut<'a, K, V>(pub(crate) IterMut<'a, K, V>);

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

/// Owning iterator in ascending key order.
pub struct IntoIter<K, V>(std::vec::IntoIter<(K, V)>);

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(tree: RawTree<K, V>) -> Self {
        Self(tree.into_sorted_entries().into_iter())
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}
