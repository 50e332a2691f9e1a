use std::collections::{HashSet, VecDeque};

use parking_lot::Mutex;

use crate::common::FrameId;

/// Evictable frames in the order they became evictable, with a hash
/// index for O(1) membership checks.
#[derive(Debug, Default)]
struct LruState {
    queue: VecDeque<FrameId>,
    members: HashSet<FrameId>,
}

/// LRU replacement policy over buffer frames.
///
/// Tracks the set of unpinned (evictable) frames in the order they
/// became evictable and surrenders the least-recently-unpinned one on
/// demand. The LRU key is "evictable since": a frame that is unpinned
/// again while already evictable keeps its position rather than moving
/// to the back, so genuinely older frames are never starved.
pub struct LruReplacer {
    /// Maximum number of frames the replacer can track
    max_frames: usize,
    state: Mutex<LruState>,
}

impl LruReplacer {
    /// Creates a replacer for a pool of `max_frames` frames.
    pub fn new(max_frames: usize) -> Self {
        Self {
            max_frames,
            state: Mutex::new(LruState::default()),
        }
    }

    /// Removes and returns the least-recently-unpinned frame, or None
    /// if no frame is evictable.
    pub fn victim(&self) -> Option<FrameId> {
        let mut state = self.state.lock();
        let frame_id = state.queue.pop_front()?;
        state.members.remove(&frame_id);
        Some(frame_id)
    }

    /// Marks a frame as in use: it leaves the evictable set. No-op if
    /// the frame is not evictable or out of range.
    pub fn pin(&self, frame_id: FrameId) {
        if frame_id.as_usize() >= self.max_frames {
            return;
        }

        let mut state = self.state.lock();
        if state.members.remove(&frame_id) {
            state.queue.retain(|&f| f != frame_id);
        }
    }

    /// Marks a frame as evictable, appending it at the MRU end. A frame
    /// that is already evictable is left in place. Out-of-range ids are
    /// silently ignored.
    pub fn unpin(&self, frame_id: FrameId) {
        if frame_id.as_usize() >= self.max_frames {
            return;
        }

        let mut state = self.state.lock();
        if state.members.insert(frame_id) {
            state.queue.push_back(frame_id);
        }
    }

    /// Returns the number of evictable frames.
    pub fn size(&self) -> usize {
        self.state.lock().queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_replacer_empty() {
        let replacer = LruReplacer::new(10);
        assert_eq!(replacer.size(), 0);
        assert_eq!(replacer.victim(), None);
    }

    #[test]
    fn test_lru_replacer_victim_order() {
        let replacer = LruReplacer::new(10);

        replacer.unpin(FrameId::new(2));
        replacer.unpin(FrameId::new(0));
        replacer.unpin(FrameId::new(1));

        assert_eq!(replacer.size(), 3);
        assert_eq!(replacer.victim(), Some(FrameId::new(2)));
        assert_eq!(replacer.victim(), Some(FrameId::new(0)));
        assert_eq!(replacer.victim(), Some(FrameId::new(1)));
        assert_eq!(replacer.victim(), None);
    }

    #[test]
    fn test_lru_replacer_redundant_unpin_keeps_position() {
        let replacer = LruReplacer::new(10);

        replacer.unpin(FrameId::new(0));
        replacer.unpin(FrameId::new(1));
        // Frame 0 is already evictable: this must not promote it to MRU
        replacer.unpin(FrameId::new(0));

        assert_eq!(replacer.size(), 2);
        assert_eq!(replacer.victim(), Some(FrameId::new(0)));
        assert_eq!(replacer.victim(), Some(FrameId::new(1)));
    }

    #[test]
    fn test_lru_replacer_pin_removes() {
        let replacer = LruReplacer::new(10);

        replacer.unpin(FrameId::new(0));
        replacer.unpin(FrameId::new(1));
        replacer.unpin(FrameId::new(2));

        replacer.pin(FrameId::new(1));
        assert_eq!(replacer.size(), 2);

        assert_eq!(replacer.victim(), Some(FrameId::new(0)));
        assert_eq!(replacer.victim(), Some(FrameId::new(2)));
        assert_eq!(replacer.victim(), None);
    }

    #[test]
    fn test_lru_replacer_pin_absent_is_noop() {
        let replacer = LruReplacer::new(10);

        replacer.unpin(FrameId::new(0));
        replacer.pin(FrameId::new(5));

        assert_eq!(replacer.size(), 1);
        assert_eq!(replacer.victim(), Some(FrameId::new(0)));
    }

    #[test]
    fn test_lru_replacer_out_of_range_ignored() {
        let replacer = LruReplacer::new(3);

        replacer.unpin(FrameId::new(3));
        replacer.unpin(FrameId::new(100));
        assert_eq!(replacer.size(), 0);

        replacer.pin(FrameId::new(100));
        assert_eq!(replacer.victim(), None);
    }

    #[test]
    fn test_lru_replacer_unpin_after_victim_requeues() {
        let replacer = LruReplacer::new(10);

        replacer.unpin(FrameId::new(0));
        assert_eq!(replacer.victim(), Some(FrameId::new(0)));

        replacer.unpin(FrameId::new(1));
        replacer.unpin(FrameId::new(0));

        assert_eq!(replacer.victim(), Some(FrameId::new(1)));
        assert_eq!(replacer.victim(), Some(FrameId::new(0)));
    }
}
