//! File-backed stores: the executable image and the swap file.

use super::error::StoreError;
use super::{check_buffer, check_slot, PageSource, PageStore};
use log::info;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Read-only executable image.
///
/// Supplies the initial content of text and data pages. The file must hold
/// at least `min_size` contiguous bytes from offset 0 (text + data + bss);
/// anything beyond is ignored.
#[derive(Debug)]
pub struct FileImage {
    file: File,
    page_size: usize,
    num_pages: usize,
}

impl FileImage {
    /// Opens `path` read-only.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing, unreadable, or shorter than `min_size`
    /// bytes. Construction failure is fatal for the engine.
    pub fn open<P: AsRef<Path>>(
        path: P,
        page_size: usize,
        min_size: u64,
    ) -> Result<Self, StoreError> {
        let file = File::open(&path)?;
        let have = file.metadata()?.len();
        if have < min_size {
            return Err(StoreError::ImageTooSmall {
                need: min_size,
                have,
            });
        }
        Ok(FileImage {
            file,
            page_size,
            num_pages: (have / page_size as u64) as usize,
        })
    }
}

impl PageSource for FileImage {
    fn read_page(&mut self, index: usize, buf: &mut [u8]) -> Result<(), StoreError> {
        check_buffer(buf, self.page_size)?;
        check_slot(index, self.num_pages)?;
        self.file
            .seek(SeekFrom::Start((index * self.page_size) as u64))?;
        self.file.read_exact(buf)?;
        Ok(())
    }
}

/// Read-write swap store.
///
/// Holds one slot per logical page, indexed by page index. An absent file is
/// created and zero-filled to `num_pages * page_size` bytes; an existing
/// file is reused and extended with zeroes if short.
pub struct SwapFile {
    file: File,
    page_size: usize,
    num_pages: usize,
}

impl SwapFile {
    /// Opens or creates the swap file at `path`.
    ///
    /// # Errors
    ///
    /// Fails only on I/O errors; a missing file is not an error.
    pub fn open<P: AsRef<Path>>(
        path: P,
        page_size: usize,
        num_pages: usize,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let existed = path.exists();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        if !existed {
            info!("swap file {} not found, creating it", path.display());
        }
        let required = (num_pages * page_size) as u64;
        if file.metadata()?.len() < required {
            // set_len zero-fills the extension.
            file.set_len(required)?;
        }
        Ok(SwapFile {
            file,
            page_size,
            num_pages,
        })
    }
}

impl PageSource for SwapFile {
    fn read_page(&mut self, index: usize, buf: &mut [u8]) -> Result<(), StoreError> {
        check_buffer(buf, self.page_size)?;
        check_slot(index, self.num_pages)?;
        self.file
            .seek(SeekFrom::Start((index * self.page_size) as u64))?;
        self.file.read_exact(buf)?;
        Ok(())
    }
}

impl PageStore for SwapFile {
    fn write_page(&mut self, index: usize, buf: &[u8]) -> Result<(), StoreError> {
        check_buffer(buf, self.page_size)?;
        check_slot(index, self.num_pages)?;
        self.file
            .seek(SeekFrom::Start((index * self.page_size) as u64))?;
        self.file.write_all(buf)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const PAGE: usize = 16;

    #[test]
    fn test_image_rejects_short_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.img");
        fs::write(&path, [0xAB; 10]).unwrap();

        let err = FileImage::open(&path, PAGE, 64).unwrap_err();
        assert!(matches!(
            err,
            StoreError::ImageTooSmall { need: 64, have: 10 }
        ));
    }

    #[test]
    fn test_image_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileImage::open(dir.path().join("absent.img"), PAGE, 16).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[test]
    fn test_image_reads_aligned_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prog.img");
        let bytes: Vec<u8> = (0..64).collect();
        fs::write(&path, &bytes).unwrap();

        let mut image = FileImage::open(&path, PAGE, 64).unwrap();
        let mut buf = [0u8; PAGE];
        image.read_page(2, &mut buf).unwrap();
        assert_eq!(&buf[..], &bytes[32..48]);

        assert!(matches!(
            image.read_page(4, &mut buf),
            Err(StoreError::SlotOutOfRange { slot: 4, limit: 4 })
        ));
    }

    #[test]
    fn test_swap_created_zero_filled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swap");
        let mut swap = SwapFile::open(&path, PAGE, 4).unwrap();

        assert_eq!(fs::metadata(&path).unwrap().len(), 64);
        let mut buf = [0xFFu8; PAGE];
        swap.read_page(3, &mut buf).unwrap();
        assert_eq!(buf, [0u8; PAGE]);
    }

    #[test]
    fn test_swap_write_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut swap = SwapFile::open(dir.path().join("swap"), PAGE, 4).unwrap();

        let page = [0x5Au8; PAGE];
        swap.write_page(1, &page).unwrap();
        let mut buf = [0u8; PAGE];
        swap.read_page(1, &mut buf).unwrap();
        assert_eq!(buf, page);

        // Neighbouring slots are untouched.
        swap.read_page(0, &mut buf).unwrap();
        assert_eq!(buf, [0u8; PAGE]);
    }

    #[test]
    fn test_swap_rejects_bad_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let mut swap = SwapFile::open(dir.path().join("swap"), PAGE, 2).unwrap();
        let short = [0u8; 8];
        assert!(matches!(
            swap.write_page(0, &short),
            Err(StoreError::BadBufferLength { len: 8, page_size: PAGE })
        ));
    }

    #[test]
    fn test_swap_reuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swap");
        {
            let mut swap = SwapFile::open(&path, PAGE, 2).unwrap();
            swap.write_page(0, &[7u8; PAGE]).unwrap();
        }
        let mut swap = SwapFile::open(&path, PAGE, 2).unwrap();
        let mut buf = [0u8; PAGE];
        swap.read_page(0, &mut buf).unwrap();
        assert_eq!(buf, [7u8; PAGE]);
    }
}
