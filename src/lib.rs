//! Burrow - the storage core of a disk-oriented relational database
//!
//! This crate implements the two subsystems a disk-oriented engine
//! stands on: a fixed-size buffer pool that caches disk pages under an
//! LRU replacement discipline, and the B+ tree node page formats whose
//! internal and leaf nodes live inside buffer-pool frames.
//!
//! # Architecture
//!
//! - **Storage Layer** (`storage`): disk I/O
//!   - `DiskManager`: reads and writes pages in a single database file
//!   - `DiskScheduler`: background-thread disk I/O queue
//!
//! - **Buffer Pool** (`buffer`): memory management for database pages
//!   - `BufferPoolManager`: fetches pages from disk, caches them in a
//!     fixed set of frames and hands them out pinned
//!   - `LruReplacer`: least-recently-unpinned victim selection
//!   - `FrameHeader`: per-frame metadata plus the page image
//!
//! - **Index** (`index`): B+ tree node formats
//!   - `BTreeInternalPage` / `BTreeLeafPage`: the two in-page layouts,
//!     generic over fixed key widths, with search, ordered insertion,
//!     split, merge and redistribution primitives
//!   - `GenericKey` / `KeyComparator`: opaque fixed-width keys with
//!     pluggable total orders
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use burrow::buffer::BufferPoolManager;
//! use burrow::index::{BTreeLeafPage, GenericComparator, GenericKey};
//! use burrow::storage::disk::DiskManager;
//! use burrow::common::{RecordId, SlotId, INVALID_PAGE_ID};
//!
//! let disk_manager = Arc::new(DiskManager::new("test.db").unwrap());
//! let bpm = BufferPoolManager::new(100, disk_manager);
//!
//! // Allocate a page and format it as a B+ tree leaf
//! let frame = bpm.new_page().unwrap().unwrap();
//! let page_id = frame.page_id();
//! {
//!     let mut data = frame.write_data();
//!     let mut leaf = BTreeLeafPage::<8>::new(&mut data[..]);
//!     leaf.init(page_id, INVALID_PAGE_ID, 32);
//!     leaf.insert(
//!         &GenericKey::from_u64(42),
//!         RecordId::new(page_id, SlotId::new(0)),
//!         &GenericComparator::<8>,
//!     );
//! }
//! bpm.unpin_page(page_id, true);
//! bpm.flush_page(page_id).unwrap();
//! ```

pub mod buffer;
pub mod common;
pub mod index;
pub mod storage;

// Re-export commonly used types at the crate root
pub use common::{BurrowError, FrameId, PageId, RecordId, Result, SlotId};
