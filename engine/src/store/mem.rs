//! In-memory page store, used by tests and demos in place of real files.

use super::error::StoreError;
use super::{check_buffer, check_slot, PageSource, PageStore};

/// A page store over a plain byte vector.
pub struct MemStore {
    bytes: Vec<u8>,
    page_size: usize,
}

impl MemStore {
    /// A zero-filled store of `num_pages` pages.
    pub fn new(page_size: usize, num_pages: usize) -> Self {
        MemStore {
            bytes: vec![0; page_size * num_pages],
            page_size,
        }
    }

    /// A store over `bytes`, zero-padded up to a whole number of pages.
    pub fn from_bytes(page_size: usize, mut bytes: Vec<u8>) -> Self {
        let padded = bytes.len().div_ceil(page_size) * page_size;
        bytes.resize(padded, 0);
        MemStore { bytes, page_size }
    }

    pub fn num_pages(&self) -> usize {
        self.bytes.len() / self.page_size
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl PageSource for MemStore {
    fn read_page(&mut self, index: usize, buf: &mut [u8]) -> Result<(), StoreError> {
        check_buffer(buf, self.page_size)?;
        check_slot(index, self.num_pages())?;
        let start = index * self.page_size;
        buf.copy_from_slice(&self.bytes[start..start + self.page_size]);
        Ok(())
    }
}

impl PageStore for MemStore {
    fn write_page(&mut self, index: usize, buf: &[u8]) -> Result<(), StoreError> {
        check_buffer(buf, self.page_size)?;
        check_slot(index, self.num_pages())?;
        let start = index * self.page_size;
        self.bytes[start..start + self.page_size].copy_from_slice(buf);
        Ok(())
    }
}
