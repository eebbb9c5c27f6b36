//! Logical address space layout and address translation.
//!
//! The address space is partitioned into four contiguous segments in a fixed
//! order: text, data, bss, then heap/stack filling the remainder of the
//! paged space. Segment boundaries must align to page boundaries.

use super::error::{ConfigError, MemError};
use core::fmt;
use core::ops::Range;

/// Number of frames a packed page descriptor can reference.
///
/// The descriptor word stores the frame number in 14 bits.
pub const MAX_FRAMES: usize = 1 << 14;

/// Segment sizes and paging geometry, in bytes. Immutable once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    pub text_size: usize,
    pub data_size: usize,
    pub bss_size: usize,
    pub heap_stack_size: usize,
    pub page_size: usize,
    pub num_of_pages: usize,
    pub physical_size: usize,
}

/// One of the four contiguous ranges of the logical address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Read-only program text, sourced from the executable image
    Text,
    /// Initialized data, first sourced from the executable image
    Data,
    /// Zero-initialized data
    Bss,
    /// Heap and stack; allocated on first store
    HeapStack,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Text => write!(f, "text"),
            Segment::Data => write!(f, "data"),
            Segment::Bss => write!(f, "bss"),
            Segment::HeapStack => write!(f, "heap/stack"),
        }
    }
}

/// A validated layout: page ranges per segment plus the paging geometry.
#[derive(Debug, Clone)]
pub struct AddressSpaceLayout {
    config: LayoutConfig,
    text_pages: Range<usize>,
    data_pages: Range<usize>,
    bss_pages: Range<usize>,
}

impl AddressSpaceLayout {
    /// Validates `config` and derives the per-segment page ranges.
    ///
    /// # Errors
    ///
    /// Fails fast with a [`ConfigError`] if the page size is zero, a segment
    /// or the physical memory is not page-aligned, or the paged address
    /// space cannot hold the configured segments.
    pub fn new(config: LayoutConfig) -> Result<Self, ConfigError> {
        if config.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        for (segment, size) in [
            ("text", config.text_size),
            ("data", config.data_size),
            ("bss", config.bss_size),
        ] {
            if size % config.page_size != 0 {
                return Err(ConfigError::UnalignedSegment {
                    segment,
                    size,
                    page_size: config.page_size,
                });
            }
        }
        if config.physical_size == 0 || config.physical_size % config.page_size != 0 {
            return Err(ConfigError::UnalignedPhysicalMemory {
                size: config.physical_size,
                page_size: config.page_size,
            });
        }
        let required =
            config.text_size + config.data_size + config.bss_size + config.heap_stack_size;
        let total = config.num_of_pages * config.page_size;
        if total < required {
            return Err(ConfigError::AddressSpaceTooSmall { total, required });
        }
        let frames = config.physical_size / config.page_size;
        if frames > MAX_FRAMES {
            return Err(ConfigError::TooManyFrames {
                frames,
                limit: MAX_FRAMES,
            });
        }

        let text_end = config.text_size / config.page_size;
        let data_end = text_end + config.data_size / config.page_size;
        let bss_end = data_end + config.bss_size / config.page_size;
        Ok(AddressSpaceLayout {
            config,
            text_pages: 0..text_end,
            data_pages: text_end..data_end,
            bss_pages: data_end..bss_end,
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    pub fn num_of_pages(&self) -> usize {
        self.config.num_of_pages
    }

    /// Total byte size of the logical address space.
    pub fn total_size(&self) -> usize {
        self.config.num_of_pages * self.config.page_size
    }

    pub fn physical_size(&self) -> usize {
        self.config.physical_size
    }

    pub fn num_frames(&self) -> usize {
        self.config.physical_size / self.config.page_size
    }

    /// Splits a logical address into `(page index, page offset)`.
    ///
    /// Bounds are checked against the total logical address space, not the
    /// physical memory size. No side effects.
    ///
    /// # Errors
    ///
    /// Returns [`MemError::OutOfBounds`] for negative addresses and for
    /// addresses at or beyond [`total_size`](Self::total_size).
    pub fn translate(&self, addr: i64) -> Result<(usize, usize), MemError> {
        if addr < 0 || addr as u64 >= self.total_size() as u64 {
            return Err(MemError::OutOfBounds { addr });
        }
        let addr = addr as usize;
        Ok((addr / self.config.page_size, addr % self.config.page_size))
    }

    /// The segment containing `page`.
    pub fn segment_of(&self, page: usize) -> Segment {
        if self.text_pages.contains(&page) {
            Segment::Text
        } else if self.data_pages.contains(&page) {
            Segment::Data
        } else if self.bss_pages.contains(&page) {
            Segment::Bss
        } else {
            Segment::HeapStack
        }
    }

    /// Text pages are read-only: their content always comes from the
    /// executable image, never from swap.
    pub fn is_read_only(&self, page: usize) -> bool {
        self.text_pages.contains(&page)
    }

    /// Whether the executable image holds initial content for `page`
    /// (text and data segments).
    pub fn backed_by_image(&self, page: usize) -> bool {
        page < self.data_pages.end
    }

    /// Whether `page` lies beyond text+data+bss, in the heap/stack region.
    pub fn is_heap_stack(&self, page: usize) -> bool {
        page >= self.bss_pages.end
    }

    /// Page index range of `segment`, for presentation layers that group
    /// page table entries by segment.
    pub fn pages_of(&self, segment: Segment) -> Range<usize> {
        match segment {
            Segment::Text => self.text_pages.clone(),
            Segment::Data => self.data_pages.clone(),
            Segment::Bss => self.bss_pages.clone(),
            Segment::HeapStack => self.bss_pages.end..self.config.num_of_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LayoutConfig {
        LayoutConfig {
            text_size: 16,
            data_size: 16,
            bss_size: 32,
            heap_stack_size: 32,
            page_size: 16,
            num_of_pages: 8,
            physical_size: 48,
        }
    }

    #[test]
    fn test_segment_ranges() {
        let layout = AddressSpaceLayout::new(config()).unwrap();
        assert_eq!(layout.pages_of(Segment::Text), 0..1);
        assert_eq!(layout.pages_of(Segment::Data), 1..2);
        assert_eq!(layout.pages_of(Segment::Bss), 2..4);
        assert_eq!(layout.pages_of(Segment::HeapStack), 4..8);

        assert_eq!(layout.segment_of(0), Segment::Text);
        assert_eq!(layout.segment_of(1), Segment::Data);
        assert_eq!(layout.segment_of(3), Segment::Bss);
        assert_eq!(layout.segment_of(7), Segment::HeapStack);

        assert!(layout.is_read_only(0));
        assert!(!layout.is_read_only(1));
        assert!(layout.backed_by_image(1));
        assert!(!layout.backed_by_image(2));
        assert!(layout.is_heap_stack(4));
        assert!(!layout.is_heap_stack(3));
    }

    #[test]
    fn test_translate() {
        let layout = AddressSpaceLayout::new(config()).unwrap();
        assert_eq!(layout.translate(0).unwrap(), (0, 0));
        assert_eq!(layout.translate(34).unwrap(), (2, 2));
        assert_eq!(layout.translate(127).unwrap(), (7, 15));
    }

    #[test]
    fn test_translate_out_of_bounds() {
        let layout = AddressSpaceLayout::new(config()).unwrap();
        assert!(matches!(
            layout.translate(-1),
            Err(MemError::OutOfBounds { addr: -1 })
        ));
        // The ceiling is the logical space, not the physical memory size.
        assert_eq!(layout.translate(48).unwrap(), (3, 0));
        assert!(matches!(
            layout.translate(128),
            Err(MemError::OutOfBounds { addr: 128 })
        ));
    }

    #[test]
    fn test_rejects_unaligned_segment() {
        let mut cfg = config();
        cfg.bss_size = 30;
        assert_eq!(
            AddressSpaceLayout::new(cfg).unwrap_err(),
            ConfigError::UnalignedSegment {
                segment: "bss",
                size: 30,
                page_size: 16,
            }
        );
    }

    #[test]
    fn test_rejects_unaligned_physical_memory() {
        let mut cfg = config();
        cfg.physical_size = 200;
        assert!(matches!(
            AddressSpaceLayout::new(cfg),
            Err(ConfigError::UnalignedPhysicalMemory { size: 200, .. })
        ));

        cfg.physical_size = 0;
        assert!(matches!(
            AddressSpaceLayout::new(cfg),
            Err(ConfigError::UnalignedPhysicalMemory { size: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_undersized_address_space() {
        let mut cfg = config();
        cfg.num_of_pages = 5;
        assert_eq!(
            AddressSpaceLayout::new(cfg).unwrap_err(),
            ConfigError::AddressSpaceTooSmall {
                total: 80,
                required: 96,
            }
        );
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let mut cfg = config();
        cfg.page_size = 0;
        assert_eq!(
            AddressSpaceLayout::new(cfg).unwrap_err(),
            ConfigError::ZeroPageSize
        );
    }
}
