use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::common::{FrameId, PageId, INVALID_PAGE_ID, PAGE_SIZE};

/// Metadata the pool tracks for one frame. All transitions happen while
/// the pool-wide mutex is held, so a single small mutex guards the lot.
#[derive(Debug)]
struct FrameMeta {
    /// The page resident in this frame (INVALID_PAGE_ID when free)
    page_id: PageId,
    /// Number of live references handed out for this frame
    pin_count: u32,
    /// Whether the image differs from the on-disk copy
    is_dirty: bool,
}

impl FrameMeta {
    fn empty() -> Self {
        Self {
            page_id: INVALID_PAGE_ID,
            pin_count: 0,
            is_dirty: false,
        }
    }
}

/// FrameHeader manages a single buffer frame: the resident page image
/// plus the metadata above. The `data` lock is the per-frame latch on
/// the page bytes, which the pool mutex deliberately does not cover.
pub struct FrameHeader {
    /// The frame ID (index in the buffer pool)
    frame_id: FrameId,
    meta: Mutex<FrameMeta>,
    /// The page image
    data: RwLock<Box<[u8; PAGE_SIZE]>>,
}

impl FrameHeader {
    pub fn new(frame_id: FrameId) -> Self {
        Self {
            frame_id,
            meta: Mutex::new(FrameMeta::empty()),
            data: RwLock::new(Box::new([0u8; PAGE_SIZE])),
        }
    }

    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }

    pub fn page_id(&self) -> PageId {
        self.meta.lock().page_id
    }

    pub(crate) fn set_page_id(&self, page_id: PageId) {
        self.meta.lock().page_id = page_id;
    }

    pub fn pin_count(&self) -> u32 {
        self.meta.lock().pin_count
    }

    /// Increments the pin count and returns the new value.
    pub(crate) fn pin(&self) -> u32 {
        let mut meta = self.meta.lock();
        meta.pin_count += 1;
        meta.pin_count
    }

    /// Decrements the pin count and returns the new value.
    /// Returns None if the pin count was already 0.
    pub(crate) fn unpin(&self) -> Option<u32> {
        let mut meta = self.meta.lock();
        if meta.pin_count == 0 {
            return None;
        }
        meta.pin_count -= 1;
        Some(meta.pin_count)
    }

    pub fn is_dirty(&self) -> bool {
        self.meta.lock().is_dirty
    }

    pub(crate) fn set_dirty(&self, dirty: bool) {
        self.meta.lock().is_dirty = dirty;
    }

    /// Latches the page image for reading.
    pub fn read_data(&self) -> RwLockReadGuard<'_, Box<[u8; PAGE_SIZE]>> {
        self.data.read()
    }

    /// Latches the page image for writing.
    pub fn write_data(&self) -> RwLockWriteGuard<'_, Box<[u8; PAGE_SIZE]>> {
        self.data.write()
    }

    /// Copies `image` into the frame.
    pub(crate) fn copy_from(&self, image: &[u8]) {
        self.write_data()[..].copy_from_slice(image);
    }

    /// Copies the frame image into `out`.
    pub(crate) fn copy_to(&self, out: &mut [u8]) {
        out.copy_from_slice(&self.read_data()[..]);
    }

    /// Returns the frame to its pristine state: no resident page, pin
    /// count zero, clean, zeroed image.
    pub(crate) fn reset(&self) {
        *self.meta.lock() = FrameMeta::empty();
        self.write_data().fill(0);
    }
}
