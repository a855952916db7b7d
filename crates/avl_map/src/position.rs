use crate::raw::Id;

/// Handle to an entry of an [`AvlMap`](crate::AvlMap), or to its end marker.
///
/// A position stays valid across insertions and across erasure of other
/// entries. Once its own entry is erased, the map treats it as absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) id: Id,
    pub(crate) generation: u64,
}

impl Position {
    pub(crate) fn new(id: Id, generation: u64) -> Self {
        Self { id, generation }
    }

    pub(crate) fn end() -> Self {
        Self::new(Id::SENTINEL, 0)
    }

    /// Whether this is the end marker.
    pub fn is_end(&self) -> bool {
        self.id.is_sentinel()
    }
}

/// Reverse view of a [`Position`].
///
/// Refers to the entry just before its base position, so `rbegin` wraps the end
/// marker and `rend` wraps the first entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RevPosition(Position);

impl RevPosition {
    pub fn new(base: Position) -> Self {
        Self(base)
    }

    pub fn base(self) -> Position {
        self.0
    }
}

impl From<Position> for RevPosition {
    fn from(base: Position) -> Self {
        Self::new(base)
    }
}
