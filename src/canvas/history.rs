//! Bounded undo history of raw raster snapshots.

use std::collections::VecDeque;

use image::RgbaImage;

/// A stack of raster snapshots with a fixed capacity.
///
/// Pushing beyond capacity evicts the oldest snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    snapshots: VecDeque<RgbaImage>,
    capacity: usize,
}

impl SnapshotHistory {
    /// Create an empty history. A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a snapshot, evicting the oldest when full.
    pub fn push(&mut self, snapshot: RgbaImage) {
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
            tracing::trace!(capacity = self.capacity, "undo history full; evicted oldest snapshot");
        }
        self.snapshots.push_back(snapshot);
    }

    /// Pop the most recent snapshot.
    pub fn pop(&mut self) -> Option<RgbaImage> {
        self.snapshots.pop_back()
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
