//! Per-page metadata: the page table and its packed descriptor word.

use arbitrary_int::{u14, Number};
use bitbybit::bitfield;

/// Packed descriptor word for one logical page.
///
/// The frame number is meaningful only while `valid` is set; `dirty` may
/// only be set while `valid` is set.
#[bitfield(u32, default = 0)]
pub struct PageDescriptor {
    #[bit(0, rw)]
    valid: bool,
    #[bit(1, rw)]
    dirty: bool,
    #[bits(2..=15, rw)]
    frame: u14,
}

/// Page table entry: descriptor word, swap bookkeeping and LRU timestamp.
#[derive(Clone, Copy)]
pub struct PageTableEntry {
    descriptor: PageDescriptor,
    /// Swap slot holding this page's last written content, if any. Retained
    /// across fault-in so a clean resident page can still be evicted without
    /// losing its stored bytes.
    swap_slot: Option<usize>,
    /// Value of the engine's monotonic access counter at the last access.
    last_access: u64,
}

impl PageTableEntry {
    fn new() -> Self {
        PageTableEntry {
            descriptor: PageDescriptor::DEFAULT,
            swap_slot: None,
            last_access: 0,
        }
    }

    pub fn valid(&self) -> bool {
        self.descriptor.valid()
    }

    pub fn dirty(&self) -> bool {
        self.descriptor.dirty()
    }

    /// The frame holding this page, or `None` while the page is not resident.
    pub fn frame(&self) -> Option<usize> {
        self.descriptor
            .valid()
            .then(|| usize::from(self.descriptor.frame().value()))
    }

    pub fn swap_slot(&self) -> Option<usize> {
        self.swap_slot
    }

    pub fn last_access(&self) -> u64 {
        self.last_access
    }

    /// Marks the page resident in `frame`, clean. The swap slot is kept:
    /// the swap copy still matches until the page is dirtied again.
    pub fn set_resident(&mut self, frame: usize) {
        debug_assert!(frame < usize::from(u14::MAX.value()) + 1);
        self.descriptor = PageDescriptor::DEFAULT
            .with_valid(true)
            .with_dirty(false)
            .with_frame(u14::new(frame as u16));
    }

    /// Records that the page was written to while resident.
    pub fn mark_dirty(&mut self) {
        debug_assert!(self.descriptor.valid());
        self.descriptor = self.descriptor.with_dirty(true);
    }

    /// Updates the LRU timestamp.
    pub fn touch(&mut self, counter: u64) {
        self.last_access = counter;
    }

    /// Records that swap slot `slot` now holds this page's content.
    pub fn record_swap_slot(&mut self, slot: usize) {
        self.swap_slot = Some(slot);
    }

    /// Clears validity, frame and dirty bit. The swap slot survives
    /// invalidation; the stored content lives on in the swap store.
    pub fn invalidate(&mut self) {
        self.descriptor = PageDescriptor::DEFAULT;
    }
}

/// Snapshot of one page table entry, for diagnostic collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub valid: bool,
    pub dirty: bool,
    pub frame: Option<usize>,
    pub swap_slot: Option<usize>,
}

/// The page table: one entry per logical page, created at engine
/// construction and mutated only by fault-in and eviction.
pub struct PageTable {
    entries: Box<[PageTableEntry]>,
}

impl PageTable {
    pub fn new(num_of_pages: usize) -> Self {
        PageTable {
            entries: vec![PageTableEntry::new(); num_of_pages].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, page: usize) -> &PageTableEntry {
        &self.entries[page]
    }

    pub fn entry_mut(&mut self, page: usize) -> &mut PageTableEntry {
        &mut self.entries[page]
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &PageTableEntry)> {
        self.entries.iter().enumerate()
    }

    /// Copies the externally visible state of every entry.
    pub fn snapshot(&self) -> Vec<PageInfo> {
        self.entries
            .iter()
            .map(|e| PageInfo {
                valid: e.valid(),
                dirty: e.dirty(),
                frame: e.frame(),
                swap_slot: e.swap_slot(),
            })
            .collect()
    }
}
