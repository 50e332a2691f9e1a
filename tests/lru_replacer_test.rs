//! Integration tests for the LRU replacer

use burrow::buffer::LruReplacer;
use burrow::common::FrameId;

#[test]
fn test_lru_victim_is_least_recently_unpinned() {
    let replacer = LruReplacer::new(10);

    for i in [3u32, 1, 4, 0] {
        replacer.unpin(FrameId::new(i));
    }

    assert_eq!(replacer.size(), 4);
    assert_eq!(replacer.victim(), Some(FrameId::new(3)));
    assert_eq!(replacer.victim(), Some(FrameId::new(1)));
    assert_eq!(replacer.victim(), Some(FrameId::new(4)));
    assert_eq!(replacer.victim(), Some(FrameId::new(0)));
    assert_eq!(replacer.victim(), None);
}

#[test]
fn test_lru_redundant_unpin_does_not_promote() {
    let replacer = LruReplacer::new(10);

    replacer.unpin(FrameId::new(0));
    replacer.unpin(FrameId::new(1));
    replacer.unpin(FrameId::new(2));

    // Frame 0 has been evictable the longest; unpinning it again must
    // not move it behind frames 1 and 2
    replacer.unpin(FrameId::new(0));
    assert_eq!(replacer.size(), 3);

    assert_eq!(replacer.victim(), Some(FrameId::new(0)));
    assert_eq!(replacer.victim(), Some(FrameId::new(1)));
    assert_eq!(replacer.victim(), Some(FrameId::new(2)));
}

#[test]
fn test_lru_pin_removes_from_evictable_set() {
    let replacer = LruReplacer::new(10);

    replacer.unpin(FrameId::new(0));
    replacer.unpin(FrameId::new(1));

    replacer.pin(FrameId::new(0));
    assert_eq!(replacer.size(), 1);
    assert_eq!(replacer.victim(), Some(FrameId::new(1)));
    assert_eq!(replacer.victim(), None);

    // Pinning an absent or out-of-range frame is a no-op
    replacer.pin(FrameId::new(1));
    replacer.pin(FrameId::new(999));
    assert_eq!(replacer.size(), 0);
}

#[test]
fn test_lru_interleaved_pin_unpin() {
    let replacer = LruReplacer::new(10);

    replacer.unpin(FrameId::new(0));
    replacer.unpin(FrameId::new(1));
    replacer.pin(FrameId::new(0));
    replacer.unpin(FrameId::new(2));
    replacer.unpin(FrameId::new(0));

    // Order of becoming evictable: 1, 2, 0
    assert_eq!(replacer.victim(), Some(FrameId::new(1)));
    assert_eq!(replacer.victim(), Some(FrameId::new(2)));
    assert_eq!(replacer.victim(), Some(FrameId::new(0)));
}

#[test]
fn test_lru_concurrent_access() {
    use std::sync::Arc;
    use std::thread;

    let replacer = Arc::new(LruReplacer::new(100));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let replacer = Arc::clone(&replacer);
            thread::spawn(move || {
                for i in 0..25 {
                    replacer.unpin(FrameId::new((t * 25 + i) as u32));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(replacer.size(), 100);

    for _ in 0..100 {
        assert!(replacer.victim().is_some());
    }
    assert_eq!(replacer.victim(), None);
}
