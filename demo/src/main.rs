//! Drives the paging engine through an eviction-heavy scenario and prints
//! the diagnostic dumps.
//!
//! Set `RUST_LOG=debug` to watch fault-in and eviction decisions.

mod dump;

use log::info;
use simmem::store::{FileImage, SwapFile};
use simmem::{LayoutConfig, PagingEngine};
use std::error::Error;
use std::fs;

/// text 16 B, data 16 B, bss 32 B, heap/stack 32 B; 8 pages of 16 bytes
/// over 3 physical frames, so pressure builds quickly.
const CONFIG: LayoutConfig = LayoutConfig {
    text_size: 16,
    data_size: 16,
    bss_size: 32,
    heap_stack_size: 32,
    page_size: 16,
    num_of_pages: 8,
    physical_size: 48,
};

/// A recognizable executable image: one text page, one data page, and a
/// zeroed bss region.
fn image_bytes() -> Vec<u8> {
    let mut bytes = Vec::with_capacity(64);
    bytes.extend_from_slice(b"TEXT-SEGMENT-00!");
    bytes.extend_from_slice(b"DATA-SEGMENT-00!");
    bytes.resize(64, 0);
    bytes
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let dir = std::env::temp_dir();
    let image_path = dir.join("simmem-demo.img");
    let swap_path = dir.join("simmem-demo.swap");
    fs::write(&image_path, image_bytes())?;
    // Start from a fresh swap so repeated runs are deterministic.
    if swap_path.exists() {
        fs::remove_file(&swap_path)?;
    }

    let image = FileImage::open(&image_path, CONFIG.page_size, 64)?;
    let swap = SwapFile::open(&swap_path, CONFIG.page_size, CONFIG.num_of_pages)?;
    let mut engine = PagingEngine::new(CONFIG, image, swap)?;

    // Touch one page per segment kind, then keep going until frames run out
    // and the engine has to evict.
    engine.store(98, b'X')?; // heap/stack page 6, allocated by the store
    let text_byte = engine.load(8)?; // text page 0, from the image
    info!("load(8) returned {:#04x} ({})", text_byte, char::from(text_byte));
    engine.store(34, b'B')?; // bss page 2, zero-filled then dirtied
    engine.load(16)?; // data page 1: no frame free, evicts the clean text page
    engine.store(17, b'd')?; // dirty the data page in place

    // Reload the heap byte after more pressure to show it survives swap.
    engine.load(0)?; // text back in, evicts the LRU dirty page
    let heap_byte = engine.load(98)?;
    info!("heap byte after eviction round trip: {}", char::from(heap_byte));

    println!("{}", dump::page_table(engine.layout(), &engine.page_table()));
    println!(
        "{}",
        dump::memory(
            "physical memory (one frame per row)",
            engine.physical_memory(),
            CONFIG.page_size,
        )
    );
    println!(
        "{}",
        dump::memory(
            "swap (one slot per page)",
            &engine.swap_contents()?,
            CONFIG.page_size,
        )
    );

    fs::remove_file(&image_path)?;
    fs::remove_file(&swap_path)?;
    Ok(())
}
