use super::{Id, LEFT, RIGHT, RawTree};

impl<K, V> RawTree<K, V> {
    /// Follows `dir` links from `x` as far as they go.
    fn extreme(&self, mut x: Id, dir: usize) -> Id {
        debug_assert!(x.is_node());
        loop {
            let next = self.child(x, dir);
            if next.is_nil() {
                return x;
            }
            x = next;
        }
    }

    pub(crate) fn minimum(&self, x: Id) -> Id {
        self.extreme(x, LEFT)
    }

    pub(crate) fn maximum(&self, x: Id) -> Id {
        self.extreme(x, RIGHT)
    }

    /// Neighbour of `x` in direction `dir` (`RIGHT` = successor).
    ///
    /// The sentinel sits past both ends: stepping off either end lands on it, and
    /// stepping from it wraps around to the first (or last) node.
    fn step(&self, x: Id, dir: usize) -> Id {
        if x.is_sentinel() {
            let root = self.root();
            return if root.is_sentinel() {
                root
            } else {
                self.extreme(root, dir ^ 1)
            };
        }
        let next = self.child(x, dir);
        if !next.is_nil() {
            return self.extreme(next, dir ^ 1);
        }
        let mut c = x;
        let mut p = self.parent(c);
        while p.is_node() && self.child(p, dir) == c {
            c = p;
            p = self.parent(c);
        }
        p
    }

    pub(crate) fn successor(&self, x: Id) -> Id {
        self.step(x, RIGHT)
    }

    pub(crate) fn predecessor(&self, x: Id) -> Id {
        self.step(x, LEFT)
    }

    pub(crate) fn first(&self) -> Id {
        self.successor(Id::SENTINEL)
    }

    pub(crate) fn last(&self) -> Id {
        self.predecessor(Id::SENTINEL)
    }

    /// Live nodes in ascending order.
    pub(crate) fn in_order(&self) -> Vec<Id> {
        let mut order = Vec::with_capacity(self.len());
        let mut x = self.first();
        while !x.is_sentinel() {
            order.push(x);
            x = self.successor(x);
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Id, RawTree};
    use crate::Natural;

    fn build(keys: &[i32]) -> RawTree<i32, ()> {
        let mut tree = RawTree::new();
        for &k in keys {
            tree.insert(k, (), &Natural);
        }
        tree
    }

    #[test]
    fn empty_tree_steps_stay_on_sentinel() {
        let tree = build(&[]);
        assert_eq!(tree.successor(Id::SENTINEL), Id::SENTINEL);
        assert_eq!(tree.predecessor(Id::SENTINEL), Id::SENTINEL);
        assert!(tree.in_order().is_empty());
    }

    #[test]
    fn walks_both_directions() {
        let tree = build(&[10, 20, 5, 6, 15, 30, 25]);
        let forward: Vec<_> = tree.in_order().iter().map(|&x| *tree.key(x)).collect();
        assert_eq!(forward, vec![5, 6, 10, 15, 20, 25, 30]);

        let mut backward = Vec::new();
        let mut x = tree.last();
        while !x.is_sentinel() {
            backward.push(*tree.key(x));
            x = tree.predecessor(x);
        }
        assert_eq!(backward, vec![30, 25, 20, 15, 10, 6, 5]);
    }

    #[test]
    fn sentinel_wraps_to_the_ends() {
        let tree = build(&[3, 1, 2]);
        let first = tree.first();
        let last = tree.last();
        assert_eq!(*tree.key(first), 1);
        assert_eq!(*tree.key(last), 3);
        assert_eq!(tree.successor(last), Id::SENTINEL);
        assert_eq!(tree.predecessor(first), Id::SENTINEL);
        assert_eq!(tree.minimum(tree.root()), first);
        assert_eq!(tree.maximum(tree.root()), last);
    }

    #[test]
    fn single_node_is_its_own_min_and_max() {
        let tree = build(&[42]);
        let root = tree.root();
        assert_eq!(tree.first(), root);
        assert_eq!(tree.last(), root);
        assert_eq!(tree.successor(root), Id::SENTINEL);
        assert_eq!(tree.predecessor(root), Id::SENTINEL);
    }
}
