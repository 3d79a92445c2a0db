use core::cmp::Ordering;

/// Draw-order bin. Higher bins are drawn later (on top).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Bin(pub i32);

impl Bin {
    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }
}

/// Stable sort key for scene entries: bin ascending, then insertion order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SortKey {
    pub bin: Bin,
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(bin: Bin, order: u32) -> Self {
        Self { bin, order }
    }
}

impl Ord for SortKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.bin.cmp(&other.bin).then(self.order.cmp(&other.order))
    }
}

impl PartialOrd for SortKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
