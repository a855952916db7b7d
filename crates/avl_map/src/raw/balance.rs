use super::{Id, LEFT, RIGHT, RawTree};

impl<K, V> RawTree<K, V> {
    /// Height of the subtree at `x`; absent children and the sentinel count as 0.
    #[inline(always)]
    pub(crate) fn height(&self, x: Id) -> u8 {
        if x.is_node() { self.node(x).height } else { 0 }
    }

    #[inline]
    fn recalc(&mut self, x: Id) {
        let [l, r] = self.node(x).ch;
        let height = 1 + self.height(l).max(self.height(r));
        self.node_mut(x).height = height;
    }

    #[inline]
    pub(crate) fn balance_factor(&self, x: Id) -> i32 {
        let [l, r] = self.node(x).ch;
        i32::from(self.height(l)) - i32::from(self.height(r))
    }

    /// Moves `x` down towards `dir`; its child on the other side takes its place.
    ///
    /// Returns the new root of the rotated subtree.
    fn rotate(&mut self, x: Id, dir: usize) -> Id {
        let up = dir ^ 1;
        let y = self.child(x, up);
        debug_assert!(y.is_node(), "rotation at {x:?} needs a child to pivot on");
        let b = self.child(y, dir);
        let p = self.parent(x);

        self.node_mut(x).ch[up] = b;
        if !b.is_nil() {
            self.node_mut(b).p = x;
        }

        self.replace_child(p, x, y);
        self.node_mut(y).p = p;

        self.node_mut(y).ch[dir] = x;
        self.node_mut(x).p = y;

        self.recalc(x);
        self.recalc(y);
        let direction = if dir == LEFT { "left" } else { "right" };
        tracing::trace!(pivot = ?x, new_root = ?y, direction, "rotated");
        y
    }

    pub(crate) fn rotate_left(&mut self, x: Id) -> Id {
        self.rotate(x, LEFT)
    }

    pub(crate) fn rotate_right(&mut self, x: Id) -> Id {
        self.rotate(x, RIGHT)
    }

    /// Restores heights and balance on the path from `start` up to the root.
    pub(crate) fn rebalance(&mut self, start: Id) {
        let mut x = start;
        while x.is_node() {
            self.recalc(x);
            let bf = self.balance_factor(x);
            if bf < -1 {
                let r = self.child(x, RIGHT);
                if self.balance_factor(r) > 0 {
                    self.rotate_right(r);
                }
                x = self.rotate_left(x);
            } else if bf > 1 {
                let l = self.child(x, LEFT);
                if self.balance_factor(l) < 0 {
                    self.rotate_left(l);
                }
                x = self.rotate_right(x);
            }
            x = self.parent(x);
        }
    }
}
