use std::cmp::Ordering;
use std::collections::TryReserveError;

use crate::compare::Comparator;

use super::{Id, LEFT, RIGHT, RawTree};

impl<K, V> RawTree<K, V> {
    /// Finds the node holding `key`, or the free slot `(parent, side)` where it
    /// would be attached.
    pub(crate) fn locate<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Result<Id, (Id, usize)> {
        let mut parent = Id::SENTINEL;
        let mut dir = LEFT;
        let mut x = self.child(Id::SENTINEL, LEFT);
        while !x.is_nil() {
            dir = match cmp.compare(key, self.key(x)) {
                Ordering::Less => LEFT,
                Ordering::Greater => RIGHT,
                Ordering::Equal => return Ok(x),
            };
            parent = x;
            x = self.child(x, dir);
        }
        Err((parent, dir))
    }

    pub(crate) fn search<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Option<Id> {
        self.locate(key, cmp).ok()
    }

    /// Hangs the fresh leaf `x` off `parent` and rebalances above it.
    fn attach(&mut self, parent: Id, dir: usize, x: Id) {
        debug_assert!(self.child(parent, dir).is_nil());
        self.node_mut(parent).ch[dir] = x;
        self.node_mut(x).p = parent;
        self.len += 1;
        self.rebalance(parent);
    }

    /// Inserts `key` unless an equivalent key is present; an existing value is
    /// left untouched.
    pub(crate) fn insert<C: Comparator<K>>(&mut self, key: K, value: V, cmp: &C) -> (Id, bool) {
        match self.locate(&key, cmp) {
            Ok(x) => (x, false),
            Err((parent, dir)) => {
                let x = self.alloc(key, value);
                self.attach(parent, dir, x);
                (x, true)
            }
        }
    }

    pub(crate) fn try_insert<C: Comparator<K>>(
        &mut self,
        key: K,
        value: V,
        cmp: &C,
    ) -> Result<(Id, bool), TryReserveError> {
        match self.locate(&key, cmp) {
            Ok(x) => Ok((x, false)),
            Err((parent, dir)) => {
                let x = self.try_alloc(key, value)?;
                self.attach(parent, dir, x);
                Ok((x, true))
            }
        }
    }

    /// Inserts next to `hint` when `key` sorts between `hint`'s predecessor and
    /// `hint`, skipping the descent from the root; otherwise does a full insert.
    pub(crate) fn insert_hinted<C: Comparator<K>>(
        &mut self,
        hint: Id,
        key: K,
        value: V,
        cmp: &C,
    ) -> (Id, bool) {
        let against_hint = hint.is_node().then(|| cmp.compare(&key, self.key(hint)));
        if against_hint == Some(Ordering::Equal) {
            return (hint, false);
        }
        let before = self.predecessor(hint);
        let below_hint = matches!(against_hint, None | Some(Ordering::Less));
        let above_before =
            before.is_sentinel() || cmp.compare(self.key(before), &key) == Ordering::Less;
        if !(below_hint && above_before) {
            return self.insert(key, value, cmp);
        }

        let (parent, dir) = if self.is_empty() {
            (Id::SENTINEL, LEFT)
        } else if hint.is_node() && self.child(hint, LEFT).is_nil() {
            (hint, LEFT)
        } else {
            // `before` is the maximum of everything left of `hint`.
            (before, RIGHT)
        };
        let x = self.alloc(key, value);
        self.attach(parent, dir, x);
        (x, true)
    }

    /// Puts the subtree `v` (possibly `NIL`) where `u` hangs.
    fn transplant(&mut self, u: Id, v: Id) {
        let p = self.parent(u);
        self.replace_child(p, u, v);
        if !v.is_nil() {
            self.node_mut(v).p = p;
        }
    }

    /// Unlinks the live node `z`, rebalances, and hands back its entry.
    pub(crate) fn erase(&mut self, z: Id) -> (K, V) {
        debug_assert!(z.is_node());
        let [l, r] = self.node(z).ch;
        let anchor = if l.is_nil() {
            let anchor = self.parent(z);
            self.transplant(z, r);
            anchor
        } else if r.is_nil() {
            let anchor = self.parent(z);
            self.transplant(z, l);
            anchor
        } else {
            let y = self.minimum(r);
            tracing::trace!(removed = ?z, successor = ?y, "substituting successor");
            let anchor = if self.parent(y) == z {
                y
            } else {
                let anchor = self.parent(y);
                let y_right = self.child(y, RIGHT);
                self.transplant(y, y_right);
                self.node_mut(y).ch[RIGHT] = r;
                self.node_mut(r).p = y;
                anchor
            };
            self.transplant(z, y);
            self.node_mut(y).ch[LEFT] = l;
            self.node_mut(l).p = y;
            anchor
        };
        self.len -= 1;
        self.rebalance(anchor);
        self.release(z)
    }

    /// First node whose key is not ordered before `key`, or the sentinel.
    pub(crate) fn lower_bound<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Id {
        self.bound(key, cmp, |ord| ord != Ordering::Greater)
    }

    /// First node whose key is ordered after `key`, or the sentinel.
    pub(crate) fn upper_bound<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Id {
        self.bound(key, cmp, |ord| ord == Ordering::Less)
    }

    fn bound<C: Comparator<K>>(&self, key: &K, cmp: &C, take: impl Fn(Ordering) -> bool) -> Id {
        let mut best = Id::SENTINEL;
        let mut x = self.child(Id::SENTINEL, LEFT);
        while !x.is_nil() {
            if take(cmp.compare(key, self.key(x))) {
                best = x;
                x = self.child(x, LEFT);
            } else {
                x = self.child(x, RIGHT);
            }
        }
        best
    }
}
