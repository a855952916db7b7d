//! Arena-backed AVL tree with parent links and a per-tree sentinel.
//!
//! Slot 0 of the arena is the sentinel. The root hangs off the sentinel's left
//! link, so "the root's parent" and "replace the root" need no special casing:
//! every live node, the root included, has a real parent slot to rewire.

use std::collections::TryReserveError;

mod balance;
mod engine;
mod node;
mod traversal;

pub(crate) use node::{Id, LEFT, MAX_SLOTS, RIGHT};

use node::{Node, id};

pub(crate) struct RawTree<K, V> {
    nodes: Vec<Node<K, V>>,
    free: Vec<Id>,
    len: usize,
}

impl<K, V> RawTree<K, V> {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.saturating_add(1));
        nodes.push(Node::sentinel());
        Self {
            nodes,
            free: Vec::new(),
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of entries the arena can hold without reallocating.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity() - 1
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        let needed = additional.saturating_sub(self.free.len());
        self.nodes.reserve(needed);
    }

    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let needed = additional.saturating_sub(self.free.len());
        self.nodes.try_reserve(needed)
    }

    #[inline(always)]
    pub(crate) fn node(&self, x: Id) -> &Node<K, V> {
        debug_assert!(!x.is_nil());
        &self.nodes[x.idx()]
    }

    #[inline(always)]
    pub(crate) fn node_mut(&mut self, x: Id) -> &mut Node<K, V> {
        debug_assert!(!x.is_nil());
        &mut self.nodes[x.idx()]
    }

    #[inline]
    pub(crate) fn entry(&self, x: Id) -> &(K, V) {
        match &self.node(x).entry {
            Some(entry) => entry,
            None => unreachable!("vacant slot {x:?} reached through a live link"),
        }
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self, x: Id) -> &mut (K, V) {
        match &mut self.node_mut(x).entry {
            Some(entry) => entry,
            None => unreachable!("vacant slot {x:?} reached through a live link"),
        }
    }

    #[inline]
    pub(crate) fn key(&self, x: Id) -> &K {
        &self.entry(x).0
    }

    #[inline(always)]
    pub(crate) fn parent(&self, x: Id) -> Id {
        self.node(x).p
    }

    #[inline(always)]
    pub(crate) fn child(&self, x: Id, dir: usize) -> Id {
        self.node(x).ch[dir]
    }

    /// The root node, or the sentinel when the tree is empty.
    pub(crate) fn root(&self) -> Id {
        let root = self.child(Id::SENTINEL, LEFT);
        if root.is_nil() { Id::SENTINEL } else { root }
    }

    #[inline]
    pub(crate) fn generation(&self, x: Id) -> u64 {
        self.node(x).generation
    }

    /// Whether `x` still names the node it named when `generation` was read.
    pub(crate) fn is_current(&self, x: Id, generation: u64) -> bool {
        if x.is_nil() || x.idx() >= self.nodes.len() {
            return false;
        }
        let node = &self.nodes[x.idx()];
        x.is_sentinel() || (node.generation == generation && node.entry.is_some())
    }

    /// Points `p`'s link to `old` at `new` instead.
    ///
    /// The sentinel only ever links the root through its left slot.
    pub(crate) fn replace_child(&mut self, p: Id, old: Id, new: Id) {
        let node = self.node_mut(p);
        if node.ch[LEFT] == old {
            node.ch[LEFT] = new;
        } else {
            debug_assert_eq!(node.ch[RIGHT], old);
            node.ch[RIGHT] = new;
        }
    }

    pub(crate) fn alloc(&mut self, key: K, value: V) -> Id {
        if let Some(x) = self.free.pop() {
            self.node_mut(x).reuse(key, value);
            return x;
        }
        assert!(self.nodes.len() < MAX_SLOTS, "AvlMap capacity overflow");
        let x = id(self.nodes.len());
        self.nodes.push(Node::new(key, value));
        x
    }

    /// Like `alloc`, but reports an allocation failure instead of aborting.
    pub(crate) fn try_alloc(&mut self, key: K, value: V) -> Result<Id, TryReserveError> {
        if self.free.is_empty() {
            self.nodes.try_reserve(1)?;
        }
        Ok(self.alloc(key, value))
    }

    /// Returns a detached node's slot to the free list.
    pub(crate) fn release(&mut self, x: Id) -> (K, V) {
        debug_assert!(x.is_node());
        let entry = match self.node_mut(x).vacate() {
            Some(entry) => entry,
            None => unreachable!("released vacant slot {x:?}"),
        };
        self.free.push(x);
        entry
    }

    pub(crate) fn clear(&mut self) {
        for i in 1..self.nodes.len() {
            if self.nodes[i].entry.is_some() {
                self.nodes[i].vacate();
                self.free.push(id(i));
            }
        }
        self.node_mut(Id::SENTINEL).ch = [Id::NIL, Id::NIL];
        self.len = 0;
    }

    /// Entry slots indexed by `Id`, for handing out disjoint borrows.
    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = Option<&mut (K, V)>> {
        self.nodes.iter_mut().map(|node| node.entry.as_mut())
    }

    /// Moves every entry out in ascending order.
    pub(crate) fn into_sorted_entries(mut self) -> Vec<(K, V)> {
        let order = self.in_order();
        let mut entries = Vec::with_capacity(order.len());
        for x in order {
            if let Some(entry) = self.node_mut(x).entry.take() {
                entries.push(entry);
            }
        }
        entries
    }
}

#[cfg(test)]
impl<K, V> RawTree<K, V> {
    /// Asserts every structural invariant and returns the tree height.
    pub(crate) fn check<C: crate::Comparator<K>>(&self, cmp: &C) -> u8 {
        let sentinel = self.node(Id::SENTINEL);
        assert!(sentinel.entry.is_none(), "sentinel holds an entry");
        assert!(sentinel.p.is_nil(), "sentinel has a parent");
        assert!(sentinel.ch[RIGHT].is_nil(), "sentinel has a right link");

        let root = sentinel.ch[LEFT];
        if root.is_nil() {
            assert_eq!(self.len, 0);
            assert_eq!(self.root(), Id::SENTINEL);
            return 0;
        }
        assert_eq!(self.parent(root), Id::SENTINEL, "root's parent is not the sentinel");

        let mut count = 0;
        let height = self.check_subtree(root, &mut count);
        assert_eq!(count, self.len, "live counter out of sync");

        let mut prev: Option<Id> = None;
        let mut x = self.successor(Id::SENTINEL);
        let mut seen = 0;
        while !x.is_sentinel() {
            if let Some(p) = prev {
                assert_eq!(
                    cmp.compare(self.key(p), self.key(x)),
                    std::cmp::Ordering::Less,
                    "in-order keys not strictly ascending"
                );
            }
            prev = Some(x);
            seen += 1;
            x = self.successor(x);
        }
        assert_eq!(seen, self.len, "traversal length differs from len");
        height
    }

    fn check_subtree(&self, x: Id, count: &mut usize) -> u8 {
        let node = self.node(x);
        assert!(node.entry.is_some(), "vacant slot {x:?} is linked");
        *count += 1;
        let mut heights = [0_u8; 2];
        for (dir, &c) in node.ch.iter().enumerate() {
            if c.is_nil() {
                continue;
            }
            assert!(!c.is_sentinel(), "sentinel linked as a child of {x:?}");
            assert_eq!(self.parent(c), x, "broken parent link at {c:?}");
            heights[dir] = self.check_subtree(c, count);
        }
        let bf = i32::from(heights[LEFT]) - i32::from(heights[RIGHT]);
        assert!(bf.abs() <= 1, "node {x:?} has balance factor {bf}");
        let height = 1 + heights[LEFT].max(heights[RIGHT]);
        assert_eq!(node.height, height, "stale cached height at {x:?}");
        height
    }
}
