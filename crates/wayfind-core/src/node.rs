use std::fmt;

/// Opaque identifier of a location in the search space.
///
/// The meaning of the wrapped integer is defined entirely by the [`Map`]
/// that produces it (a flat cell index for grids, a vertex index for
/// graphs, ...). [`NodeId::INVALID`] is reserved.
///
/// [`Map`]: crate::Map
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel meaning "no node".
    pub const INVALID: Self = Self(u32::MAX);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Build an id from a flat index. Indices that do not fit map to
    /// [`NodeId::INVALID`].
    #[inline]
    pub fn from_index(index: usize) -> Self {
        u32::try_from(index).map_or(Self::INVALID, Self)
    }

    /// The id as a flat index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#invalid")
        }
    }
}

/// Reference to a node record owned by a [`Storage`].
///
/// A handle pairs a slot index with the generation the slot had when the
/// record was created. Once the storage is reset (or the record destroyed)
/// the slot generation moves on and the old handle no longer resolves.
///
/// [`Storage`]: crate::Storage
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    index: u32,
    generation: u32,
}

impl NodeHandle {
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index inside the owning storage.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

/// Per-location search record.
///
/// One record exists for every [`NodeId`] the current search has touched.
/// Records are created by the storage with infinite costs so that the first
/// relaxation always succeeds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// Best known predecessor. `None` only for the source and for records
    /// that have not been relaxed yet.
    pub parent: Option<NodeHandle>,
    /// Accumulated cost from the source.
    pub g: f32,
    /// Heuristic estimate to the destination.
    pub h: f32,
    /// Fitness, `g + h`. Open-list key.
    pub f: f32,
    /// Scratch word owned by the map, written in
    /// [`Map::initialize_neighbour`](crate::Map::initialize_neighbour).
    pub aux: u32,
}

impl Node {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            parent: None,
            g: f32::INFINITY,
            h: 0.0,
            f: f32::INFINITY,
            aux: 0,
        }
    }

    /// Whether this record is a search root (no parent, zero cost).
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none() && self.g == 0.0
    }

    /// Read [`aux`](Self::aux) as an `f32` stored with [`set_aux_f32`](Self::set_aux_f32).
    #[inline]
    pub fn aux_f32(&self) -> f32 {
        f32::from_bits(self.aux)
    }

    #[inline]
    pub fn set_aux_f32(&mut self, value: f32) {
        self.aux = value.to_bits();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_sentinel() {
        assert!(!NodeId::INVALID.is_valid());
        assert!(NodeId::new(0).is_valid());
        assert_eq!(NodeId::default(), NodeId::INVALID);
        assert_eq!(NodeId::from_index(7), NodeId(7));
        assert_eq!(NodeId::from_index(usize::MAX), NodeId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(12).to_string(), "#12");
        assert_eq!(NodeId::INVALID.to_string(), "#invalid");
    }

    #[test]
    fn fresh_record_is_unreached() {
        let n = Node::new(NodeId(3));
        assert_eq!(n.parent, None);
        assert!(n.g.is_infinite());
        assert!(n.f.is_infinite());
        assert!(!n.is_root());
    }

    #[test]
    fn aux_float_bits() {
        let mut n = Node::new(NodeId(0));
        n.set_aux_f32(2.5);
        assert_eq!(n.aux_f32(), 2.5);
    }
}
