//! The paging engine: translation, fault handling, eviction.

pub mod error;
pub mod frame_table;
pub mod layout;
pub mod page_table;
pub mod replacement;

use crate::store::{PageSource, PageStore};
use error::MemError;
use frame_table::FrameTable;
use layout::{AddressSpaceLayout, LayoutConfig};
use log::{debug, info, warn};
use page_table::{PageInfo, PageTable};
use replacement::{CleanFirstLru, ReplacementPolicy};

/// Whether a fault was raised by a load or a store.
///
/// Stores are allowed to allocate fresh zero pages in the heap/stack region;
/// loads from such pages are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Load,
    Store,
}

/// Where an invalid page's content comes from when it is faulted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageContent {
    /// Executable image, at the page's own index
    Image,
    /// Swap store slot holding the page's last written bytes
    Swap(usize),
    /// Fresh zero-filled page
    Zeroed,
}

/// Demand-paging engine over a fixed-size physical memory.
///
/// Owns the physical memory buffer, the page table and the frame table
/// exclusively; single-threaded, synchronous. Every `load`/`store` runs any
/// fault-in and eviction it triggers to completion before returning.
pub struct PagingEngine<I: PageSource, S: PageStore> {
    layout: AddressSpaceLayout,
    memory: Box<[u8]>,
    page_table: PageTable,
    frame_table: FrameTable,
    policy: Box<dyn ReplacementPolicy>,
    image: I,
    swap: S,
    /// Monotonic access counter backing the LRU timestamps. A logical
    /// counter, not a wall clock, so tie-breaking is deterministic.
    clock: u64,
}

impl<I: PageSource, S: PageStore> PagingEngine<I, S> {
    /// Builds an engine with the default clean-first LRU policy.
    ///
    /// # Errors
    ///
    /// Fails fast with [`MemError::Config`] on an inconsistent
    /// [`LayoutConfig`]; no access may be attempted against a misconfigured
    /// engine.
    pub fn new(config: LayoutConfig, image: I, swap: S) -> Result<Self, MemError> {
        Self::with_policy(config, image, swap, Box::new(CleanFirstLru))
    }

    /// Builds an engine with a caller-supplied replacement policy.
    pub fn with_policy(
        config: LayoutConfig,
        image: I,
        swap: S,
        policy: Box<dyn ReplacementPolicy>,
    ) -> Result<Self, MemError> {
        let layout = AddressSpaceLayout::new(config)?;
        info!(
            "paging engine: {} pages of {} bytes over {} frames",
            layout.num_of_pages(),
            layout.page_size(),
            layout.num_frames()
        );
        Ok(PagingEngine {
            memory: vec![0; layout.physical_size()].into_boxed_slice(),
            page_table: PageTable::new(layout.num_of_pages()),
            frame_table: FrameTable::new(layout.num_frames()),
            layout,
            policy,
            image,
            swap,
            clock: 0,
        })
    }

    /// Reads the byte at logical address `addr`, faulting the page in if
    /// needed. Does not dirty the page.
    ///
    /// # Errors
    ///
    /// [`MemError::OutOfBounds`] (no side effects),
    /// [`MemError::UninitializedHeapAccess`] for loads from never-written
    /// heap/stack pages, or [`MemError::Store`] if a backing store fails
    /// mid-fault (the page stays invalid).
    pub fn load(&mut self, addr: i64) -> Result<u8, MemError> {
        let (page, offset) = self.layout.translate(addr)?;
        let frame = match self.page_table.entry(page).frame() {
            Some(frame) => frame,
            None => self.fault_in(page, AccessMode::Load)?,
        };
        let counter = self.tick();
        self.page_table.entry_mut(page).touch(counter);
        Ok(self.memory[frame * self.layout.page_size() + offset])
    }

    /// Writes `value` at logical address `addr`, faulting the page in if
    /// needed, and marks the page dirty.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), except stores to heap/stack pages are
    /// the act of initializing them and never raise
    /// [`MemError::UninitializedHeapAccess`].
    pub fn store(&mut self, addr: i64, value: u8) -> Result<(), MemError> {
        let (page, offset) = self.layout.translate(addr)?;
        let frame = match self.page_table.entry(page).frame() {
            Some(frame) => frame,
            None => self.fault_in(page, AccessMode::Store)?,
        };
        self.memory[frame * self.layout.page_size() + offset] = value;
        let counter = self.tick();
        let entry = self.page_table.entry_mut(page);
        entry.mark_dirty();
        entry.touch(counter);
        Ok(())
    }

    // Snapshot accessors ------------------------------------------------

    pub fn layout(&self) -> &AddressSpaceLayout {
        &self.layout
    }

    /// The full physical memory contents.
    pub fn physical_memory(&self) -> &[u8] {
        &self.memory
    }

    /// The externally visible state of every page table entry.
    pub fn page_table(&self) -> Vec<PageInfo> {
        self.page_table.snapshot()
    }

    /// The full swap store contents, one slot per logical page.
    ///
    /// # Errors
    ///
    /// Propagates store read failures.
    pub fn swap_contents(&mut self) -> Result<Vec<u8>, MemError> {
        let page_size = self.layout.page_size();
        let mut out = vec![0; self.layout.num_of_pages() * page_size];
        for slot in 0..self.layout.num_of_pages() {
            self.swap
                .read_page(slot, &mut out[slot * page_size..(slot + 1) * page_size])?;
        }
        Ok(out)
    }

    // Fault handling ----------------------------------------------------

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Decides where an invalid page's content comes from. Pure; rejecting
    /// a load from a never-written heap/stack page happens here, before any
    /// frame is touched.
    fn plan_source(&self, page: usize, mode: AccessMode) -> Result<PageContent, MemError> {
        if self.layout.is_read_only(page) {
            return Ok(PageContent::Image);
        }
        if let Some(slot) = self.page_table.entry(page).swap_slot() {
            return Ok(PageContent::Swap(slot));
        }
        if self.layout.backed_by_image(page) {
            return Ok(PageContent::Image);
        }
        if self.layout.is_heap_stack(page) && mode == AccessMode::Load {
            warn!("rejecting load from heap/stack page {page} with no stored content");
            return Err(MemError::UninitializedHeapAccess { page });
        }
        Ok(PageContent::Zeroed)
    }

    /// Makes `page` resident and returns its frame.
    ///
    /// The content is staged into a scratch buffer before any frame is
    /// acquired, so a failed store read leaves the page table, frame table
    /// and physical memory untouched.
    fn fault_in(&mut self, page: usize, mode: AccessMode) -> Result<usize, MemError> {
        let source = self.plan_source(page, mode)?;
        let page_size = self.layout.page_size();
        let mut buf = vec![0u8; page_size];
        match source {
            PageContent::Image => self.image.read_page(page, &mut buf)?,
            PageContent::Swap(slot) => self.swap.read_page(slot, &mut buf)?,
            PageContent::Zeroed => {}
        }

        let frame = self.acquire_frame()?;
        debug!("page {page} faulted in to frame {frame} from {source:?}");
        self.memory[frame * page_size..(frame + 1) * page_size].copy_from_slice(&buf);
        self.page_table.entry_mut(page).set_resident(frame);
        self.frame_table.assign(frame, page);
        Ok(frame)
    }

    /// A free frame, reclaiming one through eviction if none is free.
    fn acquire_frame(&mut self) -> Result<usize, MemError> {
        if let Some(frame) = self.frame_table.find_free() {
            return Ok(frame);
        }
        let victim = self.policy.select_victim(&self.page_table)?;
        debug!("no free frame, evicting page {victim}");
        self.evict(victim)
    }

    /// Pages out `victim` and returns its vacated frame. Dirty content is
    /// written to the swap slot matching the victim's page index; a failed
    /// write-back leaves the victim resident.
    fn evict(&mut self, victim: usize) -> Result<usize, MemError> {
        let entry = *self.page_table.entry(victim);
        let frame = entry.frame().ok_or(MemError::InternalInconsistency(
            "eviction victim is not resident",
        ))?;
        if entry.dirty() {
            let page_size = self.layout.page_size();
            let start = frame * page_size;
            self.swap
                .write_page(victim, &self.memory[start..start + page_size])?;
            self.page_table.entry_mut(victim).record_swap_slot(victim);
            debug!("wrote dirty page {victim} back to swap slot {victim}");
        }
        self.page_table.entry_mut(victim).invalidate();
        match self.frame_table.release(frame) {
            Some(page) if page == victim => Ok(frame),
            _ => Err(MemError::InternalInconsistency(
                "frame table occupant does not match eviction victim",
            )),
        }
    }
}
