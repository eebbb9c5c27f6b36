//! Renders engine snapshots for human inspection.
//!
//! Works only against the read-only accessors; the engine's internals stay
//! with the engine.

use core::fmt::Write;
use simmem::{AddressSpaceLayout, PageInfo, Segment};

/// The page table, grouped by segment.
pub fn page_table(layout: &AddressSpaceLayout, pages: &[PageInfo]) -> String {
    let mut out = String::new();
    for segment in [Segment::Text, Segment::Data, Segment::Bss, Segment::HeapStack] {
        let range = layout.pages_of(segment);
        if range.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{segment} pages");
        let _ = writeln!(out, "page  valid dirty frame swap");
        for page in range {
            let info = &pages[page];
            let _ = writeln!(
                out,
                "{page:>4}  {:>5} {:>5} {:>5} {:>4}",
                u8::from(info.valid),
                u8::from(info.dirty),
                opt(info.frame),
                opt(info.swap_slot),
            );
        }
    }
    out
}

/// A byte buffer, one page-sized row per line, hex plus printable ASCII.
/// Renders both physical memory (rows are frames) and swap (rows are slots).
pub fn memory(title: &str, bytes: &[u8], page_size: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    for (row, chunk) in bytes.chunks(page_size).enumerate() {
        let mut hex = String::new();
        let mut ascii = String::new();
        for &b in chunk {
            let _ = write!(hex, "{b:02x} ");
            ascii.push(if b.is_ascii_graphic() { char::from(b) } else { '.' });
        }
        let _ = writeln!(out, "{row:>4}: {hex}|{ascii}|");
    }
    out
}

fn opt(v: Option<usize>) -> String {
    v.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use simmem::LayoutConfig;

    #[test]
    fn test_page_table_groups_by_segment() {
        let layout = AddressSpaceLayout::new(LayoutConfig {
            text_size: 16,
            data_size: 16,
            bss_size: 32,
            heap_stack_size: 32,
            page_size: 16,
            num_of_pages: 8,
            physical_size: 48,
        })
        .unwrap();
        let pages = vec![
            PageInfo {
                valid: true,
                dirty: false,
                frame: Some(1),
                swap_slot: None,
            };
            8
        ];

        let rendered = page_table(&layout, &pages);
        assert!(rendered.contains("text pages"));
        assert!(rendered.contains("heap/stack pages"));
        assert_eq!(rendered.matches("page  valid dirty frame swap").count(), 4);
    }

    #[test]
    fn test_memory_rows_are_page_sized() {
        let rendered = memory("swap", &[0u8; 32], 16);
        assert!(rendered.starts_with("swap\n"));
        assert_eq!(rendered.lines().count(), 3);
        assert!(rendered.contains("|................|"));
    }
}
