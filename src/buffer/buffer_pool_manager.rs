use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;

use crate::common::{FrameId, PageId, Result, PAGE_SIZE};
use crate::storage::disk::{DiskManager, DiskScheduler};

use super::{FrameHeader, LruReplacer};

/// Bookkeeping protected by the pool-wide mutex.
struct PoolState {
    /// Page table: maps resident page IDs to frame IDs
    page_table: HashMap<PageId, FrameId>,
    /// Frames that hold no page at all
    free_list: VecDeque<FrameId>,
}

/// BufferPoolManager caches disk pages in a fixed set of frames and
/// hands them out pinned. Victims are chosen by LRU over the unpinned
/// frames.
///
/// Every public operation is made atomic by a single pool-wide mutex
/// covering the page table, the free list, frame metadata transitions
/// and the replacer interaction (lock order is always pool before
/// replacer). Physical I/O happens while the mutex is held. The mutex
/// does not protect frame contents: callers latch the page bytes
/// through [`FrameHeader::read_data`] / [`FrameHeader::write_data`].
pub struct BufferPoolManager {
    /// Number of frames in the buffer pool
    pool_size: usize,
    /// The buffer pool frames, created once and never reallocated
    frames: Vec<Arc<FrameHeader>>,
    /// Page table and free list
    state: Mutex<PoolState>,
    /// LRU replacer for eviction decisions
    replacer: LruReplacer,
    /// Disk scheduler for physical I/O
    disk_scheduler: DiskScheduler,
}

impl BufferPoolManager {
    /// Creates a buffer pool of `pool_size` frames, all initially free.
    pub fn new(pool_size: usize, disk_manager: Arc<DiskManager>) -> Self {
        let mut frames = Vec::with_capacity(pool_size);
        let mut free_list = VecDeque::with_capacity(pool_size);

        for i in 0..pool_size {
            let frame_id = FrameId::new(i as u32);
            frames.push(Arc::new(FrameHeader::new(frame_id)));
            free_list.push_back(frame_id);
        }

        Self {
            pool_size,
            frames,
            state: Mutex::new(PoolState {
                page_table: HashMap::new(),
                free_list,
            }),
            replacer: LruReplacer::new(pool_size),
            disk_scheduler: DiskScheduler::new(disk_manager),
        }
    }

    /// Fetches `page_id` into the pool and returns its frame, pinned.
    ///
    /// Returns `Ok(None)` when the page is not resident and every frame
    /// is pinned (pool exhausted). On success the frame holds the
    /// current on-disk image and `pin_count >= 1`; at most one frame
    /// ever holds a given page id.
    pub fn fetch_page(&self, page_id: PageId) -> Result<Option<Arc<FrameHeader>>> {
        let mut state = self.state.lock();

        // Already resident: pin and return
        if let Some(&frame_id) = state.page_table.get(&page_id) {
            let frame = &self.frames[frame_id.as_usize()];
            frame.pin();
            self.replacer.pin(frame_id);
            return Ok(Some(Arc::clone(frame)));
        }

        let frame_id = match self.acquire_frame(&mut state)? {
            Some(frame_id) => frame_id,
            None => return Ok(None),
        };
        let frame = &self.frames[frame_id.as_usize()];

        state.page_table.insert(page_id, frame_id);
        frame.set_page_id(page_id);
        frame.pin();
        self.replacer.pin(frame_id);

        match self.disk_scheduler.schedule_read_sync(page_id) {
            Ok(image) => frame.copy_from(&image[..]),
            Err(e) => {
                // Back out the half-installed mapping
                state.page_table.remove(&page_id);
                frame.reset();
                state.free_list.push_back(frame_id);
                return Err(e);
            }
        }

        Ok(Some(Arc::clone(frame)))
    }

    /// Allocates a brand-new page on disk and returns its frame, pinned
    /// and zeroed. Returns `Ok(None)` when every frame is pinned.
    pub fn new_page(&self) -> Result<Option<Arc<FrameHeader>>> {
        let mut state = self.state.lock();

        // Refuse before touching the disk manager
        if state.free_list.is_empty() && self.replacer.size() == 0 {
            return Ok(None);
        }

        let page_id = self.disk_scheduler.disk_manager().allocate_page()?;

        let frame_id = match self.acquire_frame(&mut state)? {
            Some(frame_id) => frame_id,
            None => return Ok(None),
        };
        let frame = &self.frames[frame_id.as_usize()];

        state.page_table.insert(page_id, frame_id);
        frame.set_page_id(page_id);
        frame.pin();
        self.replacer.pin(frame_id);

        debug!("new page {} in {}", page_id, frame_id);
        Ok(Some(Arc::clone(frame)))
    }

    /// Drops one pin on `page_id`, optionally declaring the page dirty.
    ///
    /// Returns false if the page is not resident or already unpinned.
    /// A `true` dirty flag is sticky: a later clean unpin never clears
    /// it; only eviction write-back or an explicit flush does. When the
    /// last pin drops the frame becomes evictable.
    pub fn unpin_page(&self, page_id: PageId, is_dirty: bool) -> bool {
        let state = self.state.lock();

        let frame_id = match state.page_table.get(&page_id) {
            Some(&frame_id) => frame_id,
            None => return false,
        };
        let frame = &self.frames[frame_id.as_usize()];

        if frame.pin_count() == 0 {
            return false;
        }

        if is_dirty {
            frame.set_dirty(true);
        }

        if frame.unpin() == Some(0) {
            self.replacer.unpin(frame_id);
        }
        true
    }

    /// Writes a resident page's image to disk regardless of its dirty
    /// bit and clears the bit. Returns false if the page is not
    /// resident. Flushing does not unpin.
    pub fn flush_page(&self, page_id: PageId) -> Result<bool> {
        let state = self.state.lock();

        let frame_id = match state.page_table.get(&page_id) {
            Some(&frame_id) => frame_id,
            None => return Ok(false),
        };
        let frame = &self.frames[frame_id.as_usize()];

        let mut image = [0u8; PAGE_SIZE];
        frame.copy_to(&mut image);
        self.disk_scheduler.schedule_write_sync(page_id, &image)?;
        frame.set_dirty(false);

        Ok(true)
    }

    /// Flushes every resident page, pinned ones included.
    pub fn flush_all_pages(&self) -> Result<()> {
        let state = self.state.lock();

        for (&page_id, &frame_id) in state.page_table.iter() {
            let frame = &self.frames[frame_id.as_usize()];

            let mut image = [0u8; PAGE_SIZE];
            frame.copy_to(&mut image);
            self.disk_scheduler.schedule_write_sync(page_id, &image)?;
            frame.set_dirty(false);
        }

        Ok(())
    }

    /// Removes a page from the pool and deallocates it on disk.
    ///
    /// A page that is not resident deallocates immediately and returns
    /// true. A pinned page cannot be deleted and returns false.
    pub fn delete_page(&self, page_id: PageId) -> Result<bool> {
        let mut state = self.state.lock();

        let frame_id = match state.page_table.get(&page_id) {
            Some(&frame_id) => frame_id,
            None => {
                self.disk_scheduler.disk_manager().deallocate_page(page_id);
                return Ok(true);
            }
        };
        let frame = &self.frames[frame_id.as_usize()];

        if frame.pin_count() > 0 {
            return Ok(false);
        }

        state.page_table.remove(&page_id);
        self.replacer.pin(frame_id);
        frame.reset();
        state.free_list.push_back(frame_id);
        self.disk_scheduler.disk_manager().deallocate_page(page_id);

        Ok(true)
    }

    /// Returns the pin count of a resident page.
    pub fn get_pin_count(&self, page_id: PageId) -> Option<u32> {
        let state = self.state.lock();
        state
            .page_table
            .get(&page_id)
            .map(|&frame_id| self.frames[frame_id.as_usize()].pin_count())
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    pub fn free_frame_count(&self) -> usize {
        self.state.lock().free_list.len()
    }

    /// Number of evictable frames.
    pub fn evictable_count(&self) -> usize {
        self.replacer.size()
    }

    pub fn disk_manager(&self) -> &Arc<DiskManager> {
        self.disk_scheduler.disk_manager()
    }

    /// Hands out a frame to load a page into: the free list first, then
    /// an LRU victim. A dirty victim's image is written back before the
    /// frame is reused; the victim's page-table entry is removed and the
    /// frame comes back zeroed and clean. `Ok(None)` means every frame
    /// is pinned.
    fn acquire_frame(&self, state: &mut PoolState) -> Result<Option<FrameId>> {
        if let Some(frame_id) = state.free_list.pop_front() {
            return Ok(Some(frame_id));
        }

        let frame_id = match self.replacer.victim() {
            Some(frame_id) => frame_id,
            None => return Ok(None),
        };
        let frame = &self.frames[frame_id.as_usize()];
        let old_page_id = frame.page_id();

        if frame.is_dirty() {
            debug!("evicting dirty {} from {}", old_page_id, frame_id);
            let mut image = [0u8; PAGE_SIZE];
            frame.copy_to(&mut image);
            if let Err(e) = self.disk_scheduler.schedule_write_sync(old_page_id, &image) {
                // The victim stays resident; make it evictable again
                self.replacer.unpin(frame_id);
                return Err(e);
            }
        }

        state.page_table.remove(&old_page_id);
        frame.reset();
        Ok(Some(frame_id))
    }
}
