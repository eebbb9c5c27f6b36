use core::fmt;
use std::io;

/// Error type for backing store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying I/O failure (open, seek, read or write)
    Io(io::Error),
    /// The executable image is shorter than the segments it must back
    ImageTooSmall { need: u64, have: u64 },
    /// Page index beyond the store's capacity
    SlotOutOfRange { slot: usize, limit: usize },
    /// Transfer buffer is not exactly one page
    BadBufferLength { len: usize, page_size: usize },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {e}"),
            StoreError::ImageTooSmall { need, have } => write!(
                f,
                "executable image holds {have} bytes but must back {need} bytes of segments"
            ),
            StoreError::SlotOutOfRange { slot, limit } => {
                write!(f, "page slot {slot} beyond store capacity of {limit} pages")
            }
            StoreError::BadBufferLength { len, page_size } => {
                write!(f, "buffer of {len} bytes is not one page of {page_size} bytes")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}
