use crate::store::error::StoreError;
use core::fmt;

/// Error type for inconsistent engine configurations.
///
/// Raised while constructing an [`AddressSpaceLayout`] and therefore before
/// any access takes place.
///
/// [`AddressSpaceLayout`]: super::layout::AddressSpaceLayout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The page size is zero
    ZeroPageSize,
    /// A segment's byte size is not a multiple of the page size
    UnalignedSegment {
        segment: &'static str,
        size: usize,
        page_size: usize,
    },
    /// The physical memory size is zero or not a multiple of the page size
    UnalignedPhysicalMemory { size: usize, page_size: usize },
    /// The paged address space is smaller than the configured segments
    AddressSpaceTooSmall { total: usize, required: usize },
    /// More frames than a page descriptor can reference
    TooManyFrames { frames: usize, limit: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroPageSize => write!(f, "page size must be non-zero"),
            ConfigError::UnalignedSegment {
                segment,
                size,
                page_size,
            } => write!(
                f,
                "{segment} segment size {size} is not a multiple of the page size {page_size}"
            ),
            ConfigError::UnalignedPhysicalMemory { size, page_size } => write!(
                f,
                "physical memory size {size} is not a non-zero multiple of the page size {page_size}"
            ),
            ConfigError::AddressSpaceTooSmall { total, required } => write!(
                f,
                "address space of {total} bytes cannot hold {required} bytes of segments"
            ),
            ConfigError::TooManyFrames { frames, limit } => write!(
                f,
                "{frames} frames exceed the {limit} representable in a page descriptor"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Error type for memory accesses and engine construction.
#[derive(Debug)]
pub enum MemError {
    /// The address is negative or beyond the logical address space
    OutOfBounds { addr: i64 },
    /// A load faulted on a heap/stack page that was never stored to
    UninitializedHeapAccess { page: usize },
    /// The engine configuration is inconsistent
    Config(ConfigError),
    /// A backing store failed during construction, page-in or page-out
    Store(StoreError),
    /// Frame accounting no longer matches the page table; a defect, not a
    /// recoverable condition
    InternalInconsistency(&'static str),
}

impl fmt::Display for MemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemError::OutOfBounds { addr } => write!(f, "address {addr} is out of bounds"),
            MemError::UninitializedHeapAccess { page } => {
                write!(f, "load from uninitialized heap/stack page {page}")
            }
            MemError::Config(e) => write!(f, "invalid configuration: {e}"),
            MemError::Store(e) => write!(f, "backing store failure: {e}"),
            MemError::InternalInconsistency(what) => {
                write!(f, "internal inconsistency: {what}")
            }
        }
    }
}

impl std::error::Error for MemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MemError::Config(e) => Some(e),
            MemError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for MemError {
    fn from(e: ConfigError) -> Self {
        MemError::Config(e)
    }
}

impl From<StoreError> for MemError {
    fn from(e: StoreError) -> Self {
        MemError::Store(e)
    }
}
