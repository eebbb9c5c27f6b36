//! Backing stores: page-granular byte sources and sinks.
//!
//! The paging engine consumes two stores: a read-only executable image
//! supplying initial text/data content, and a read-write swap store holding
//! evicted dirty pages. Both transfer whole pages at `index * page_size`.

pub mod error;
pub mod file;
pub mod mem;

use error::StoreError;

pub use file::{FileImage, SwapFile};
pub use mem::MemStore;

/// Read-only source of page-sized content.
pub trait PageSource {
    /// Fills `buf` (exactly one page) with the content of page `index`.
    ///
    /// # Errors
    ///
    /// Fails if the slot is out of range, the buffer is not one page, or the
    /// underlying read fails. Either the full page is transferred or an
    /// error is returned; there is no partial read.
    fn read_page(&mut self, index: usize, buf: &mut [u8]) -> Result<(), StoreError>;
}

/// Read-write page store.
pub trait PageStore: PageSource {
    /// Writes `buf` (exactly one page) as the content of page `index`.
    ///
    /// # Errors
    ///
    /// Same contract as [`PageSource::read_page`]; no partial writes.
    fn write_page(&mut self, index: usize, buf: &[u8]) -> Result<(), StoreError>;
}

/// Rejects transfer buffers that are not exactly one page.
fn check_buffer(buf: &[u8], page_size: usize) -> Result<(), StoreError> {
    if buf.len() != page_size {
        return Err(StoreError::BadBufferLength {
            len: buf.len(),
            page_size,
        });
    }
    Ok(())
}

/// Rejects page indices beyond the store's capacity.
fn check_slot(slot: usize, limit: usize) -> Result<(), StoreError> {
    if slot >= limit {
        return Err(StoreError::SlotOutOfRange { slot, limit });
    }
    Ok(())
}
