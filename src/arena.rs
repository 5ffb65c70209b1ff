//! Arena storage for IR nodes.
//!
//! Provides `NodeId` (a dense, total-orderable identifier) and `NodeArena`
//! (contiguous storage indexed by `NodeId`). Nodes live for the whole
//! compilation pass, so slots are never freed or reused.
//!
//! # Determinism
//! - `NodeId` ordering is by its inner `u32`.
//! - Iteration order over slots is by index (0..len), which is also the
//!   allocation order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Dense node identifier for arena-allocated graphs.
///
/// `NodeId(u32)` is `Copy`, `Eq`, `Ord`, `Hash`. The inner value is an index
/// into the arena's slot array and doubles as the node's stable identity in
/// diagnostics.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a new `NodeId` from a raw `u32`.
    ///
    /// The caller must ensure the index is within bounds of the arena that
    /// will be queried with it.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw `u32` index.
    #[inline]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Contiguous storage for node data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeArena<T> {
    slots: Vec<T>,
}

impl<T> NodeArena<T> {
    /// Creates a new empty arena.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Stores `data` in a fresh slot and returns its `NodeId`.
    pub fn allocate(&mut self, data: T) -> NodeId {
        let idx = self.slots.len() as u32;
        self.slots.push(data);
        NodeId(idx)
    }

    /// Returns a reference to the data stored at `id`, if present.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id.index())
    }

    /// Returns a mutable reference to the data stored at `id`, if present.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots.get_mut(id.index())
    }

    /// Returns `true` if `id` names an allocated slot.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.slots.len()
    }

    /// Returns the number of allocated nodes.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing has been allocated yet.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over all nodes in deterministic order (by index).
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(idx, data)| (NodeId(idx as u32), data))
    }
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Panics if `id` was not allocated by this arena.
impl<T> Index<NodeId> for NodeArena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        &self.slots[id.index()]
    }
}

impl<T> IndexMut<NodeId> for NodeArena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.slots[id.index()]
    }
}
