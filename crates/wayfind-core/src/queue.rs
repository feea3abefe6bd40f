//! Indexed priority queue backing the open list.
//!
//! Entries are kept in a binary min-heap keyed by `(f, insertion_order)`.
//! Lower `f` pops first; ties are broken by insertion order (FIFO).
//! Unlike `BinaryHeap`, every handle appears at most once and can be
//! re-keyed or removed in place.

use std::cmp::Ordering;

use crate::node::NodeHandle;

const VACANT: usize = usize::MAX;

#[derive(Clone, Copy, Debug)]
struct Entry {
    handle: NodeHandle,
    f: f32,
    /// Monotonically increasing counter used to break ties.
    seq: u64,
}

impl Entry {
    #[inline]
    fn precedes(&self, other: &Self) -> bool {
        match self.f.total_cmp(&other.f) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => self.seq < other.seq,
        }
    }
}

/// Min-priority queue of node handles keyed on fitness.
#[derive(Debug, Default)]
pub struct OpenQueue {
    heap: Vec<Entry>,
    /// Heap position per handle slot index, `VACANT` when not queued.
    positions: Vec<usize>,
    seq: u64,
}

impl OpenQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `handle` with key `f`, or re-key it if already queued. A
    /// re-keyed entry counts as freshly inserted for tie-breaking.
    pub fn push(&mut self, handle: NodeHandle, f: f32) {
        let seq = self.seq;
        self.seq += 1;

        if let Some(pos) = self.position(handle) {
            let old = self.heap[pos];
            self.heap[pos].f = f;
            self.heap[pos].seq = seq;
            if self.heap[pos].precedes(&old) {
                self.sift_up(pos);
            } else {
                self.sift_down(pos);
            }
            return;
        }

        let slot = handle.index();
        if slot >= self.positions.len() {
            self.positions.resize(slot + 1, VACANT);
        } else if self.positions[slot] != VACANT {
            // Same slot, older generation: drop the stale entry first.
            let stale = self.heap[self.positions[slot]].handle;
            self.remove(stale);
        }

        let pos = self.heap.len();
        self.heap.push(Entry { handle, f, seq });
        self.positions[slot] = pos;
        self.sift_up(pos);
    }

    /// Pop the handle with the lowest key.
    pub fn pop(&mut self) -> Option<NodeHandle> {
        self.pop_with_f().map(|(handle, _)| handle)
    }

    /// Pop the handle with the lowest key, also returning the key.
    pub fn pop_with_f(&mut self) -> Option<(NodeHandle, f32)> {
        if self.heap.is_empty() {
            return None;
        }
        let top = self.take(0);
        Some((top.handle, top.f))
    }

    /// Peek at the handle with the lowest key.
    pub fn peek(&self) -> Option<NodeHandle> {
        self.heap.first().map(|e| e.handle)
    }

    /// Remove `handle` if queued. Returns whether it was.
    pub fn remove(&mut self, handle: NodeHandle) -> bool {
        match self.position(handle) {
            Some(pos) => {
                self.take(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.position(handle).is_some()
    }

    /// Current key of `handle`, if queued.
    pub fn key(&self, handle: NodeHandle) -> Option<f32> {
        self.position(handle).map(|pos| self.heap[pos].f)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Remove every entry, keeping allocations.
    pub fn clear(&mut self) {
        for e in self.heap.drain(..) {
            self.positions[e.handle.index()] = VACANT;
        }
        self.seq = 0;
    }

    // -----------------------------------------------------------------------
    // Heap internals
    // -----------------------------------------------------------------------

    fn position(&self, handle: NodeHandle) -> Option<usize> {
        let pos = *self.positions.get(handle.index())?;
        (pos != VACANT && self.heap[pos].handle == handle).then_some(pos)
    }

    fn take(&mut self, pos: usize) -> Entry {
        let entry = self.heap.swap_remove(pos);
        self.positions[entry.handle.index()] = VACANT;
        if pos < self.heap.len() {
            self.positions[self.heap[pos].handle.index()] = pos;
            self.sift_down(pos);
            self.sift_up(pos);
        }
        entry
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.positions[self.heap[a].handle.index()] = a;
        self.positions[self.heap[b].handle.index()] = b;
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.heap[pos].precedes(&self.heap[parent]) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut best = left;
            if right < len && self.heap[right].precedes(&self.heap[left]) {
                best = right;
            }
            if !self.heap[best].precedes(&self.heap[pos]) {
                break;
            }
            self.swap(pos, best);
            pos = best;
        }
    }
}
