pub(crate) const LEFT: usize = 0;
pub(crate) const RIGHT: usize = 1;

#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Id(u32);

impl Id {
    /// Absent child.
    pub(crate) const NIL: Self = Self(u32::MAX);
    /// Slot 0 of every arena: parent of the root and the end marker.
    pub(crate) const SENTINEL: Self = Self(0);

    #[inline(always)]
    pub(crate) fn is_nil(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline(always)]
    pub(crate) fn is_sentinel(self) -> bool {
        self.0 == 0
    }

    /// `true` for a live entry node (neither `NIL` nor the sentinel).
    #[inline(always)]
    pub(crate) fn is_node(self) -> bool {
        !self.is_nil() && !self.is_sentinel()
    }

    #[inline(always)]
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

#[inline(always)]
pub(crate) fn id(v: usize) -> Id {
    debug_assert!(v < u32::MAX as usize);
    Id(v as u32)
}

/// Largest number of slots an arena can address, sentinel included.
pub(crate) const MAX_SLOTS: usize = u32::MAX as usize;

pub(crate) struct Node<K, V> {
    pub(crate) ch: [Id; 2],
    pub(crate) p: Id,
    pub(crate) height: u8,
    /// Bumped on every release; 64 bits never wrap within a process lifetime.
    pub(crate) generation: u64,
    pub(crate) entry: Option<(K, V)>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn sentinel() -> Self {
        Self {
            ch: [Id::NIL, Id::NIL],
            p: Id::NIL,
            height: 0,
            generation: 0,
            entry: None,
        }
    }

    pub(crate) fn new(key: K, value: V) -> Self {
        Self {
            ch: [Id::NIL, Id::NIL],
            p: Id::NIL,
            height: 1,
            generation: 0,
            entry: Some((key, value)),
        }
    }

    /// Puts a fresh entry into a released slot, keeping its generation.
    pub(crate) fn reuse(&mut self, key: K, value: V) {
        self.ch = [Id::NIL, Id::NIL];
        self.p = Id::NIL;
        self.height = 1;
        self.entry = Some((key, value));
    }

    /// Takes the entry out and retires the slot's current generation.
    pub(crate) fn vacate(&mut self) -> Option<(K, V)> {
        self.ch = [Id::NIL, Id::NIL];
        self.p = Id::NIL;
        self.height = 0;
        self.generation = self.generation.wrapping_add(1);
        self.entry.take()
    }
}
