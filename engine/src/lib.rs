//! Demand-paged virtual memory over a fixed-size physical memory.
//!
//! A process's logical address space (text, data, bss, heap/stack) is split
//! into fixed-size pages that are mapped into physical frames on first
//! access. When every frame is occupied, a replacement policy picks a victim
//! and dirty pages are written back to a swap store before their frame is
//! reused.
//!
//! The entry point is [`mem::PagingEngine`], which owns the physical memory
//! buffer, the page table and the frame table, and exposes byte-granular
//! [`load`](mem::PagingEngine::load) / [`store`](mem::PagingEngine::store)
//! operations plus read-only snapshots for diagnostic tooling.

pub mod mem;
pub mod store;

pub use mem::error::{ConfigError, MemError};
pub use mem::layout::{AddressSpaceLayout, LayoutConfig, Segment};
pub use mem::page_table::PageInfo;
pub use mem::{AccessMode, PagingEngine};
pub use store::error::StoreError;
pub use store::{PageSource, PageStore};
