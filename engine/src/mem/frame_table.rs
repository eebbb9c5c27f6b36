//! Tracks which logical page, if any, occupies each physical frame.

/// Ordered sequence of frame slots. A slot holds the index of the occupying
/// logical page, or `None` while the frame is free.
///
/// Invariant: each occupied slot corresponds to exactly one page whose page
/// table entry names that frame; no two valid pages share a frame.
pub struct FrameTable {
    slots: Box<[Option<usize>]>,
}

impl FrameTable {
    pub fn new(num_frames: usize) -> Self {
        FrameTable {
            slots: vec![None; num_frames].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// First free frame in frame order, if any.
    pub fn find_free(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// The page occupying `frame`, if any.
    pub fn page_at(&self, frame: usize) -> Option<usize> {
        self.slots[frame]
    }

    /// Records that `page` now occupies `frame`.
    pub fn assign(&mut self, frame: usize, page: usize) {
        debug_assert!(self.slots[frame].is_none());
        self.slots[frame] = Some(page);
    }

    /// Frees `frame`, returning its previous occupant so the caller can
    /// cross-check frame accounting against the page table.
    pub fn release(&mut self, frame: usize) -> Option<usize> {
        self.slots[frame].take()
    }
}
