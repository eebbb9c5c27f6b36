//! Victim selection when no physical frame is free.

use super::error::MemError;
use super::page_table::PageTable;

/// Selects which resident page surrenders its frame.
pub trait ReplacementPolicy {
    /// Returns the page index of the victim.
    ///
    /// # Errors
    ///
    /// Returns [`MemError::InternalInconsistency`] if no page is valid: the
    /// caller only asks for a victim when every frame is occupied, so a
    /// table without valid pages means frame accounting is broken.
    fn select_victim(&mut self, table: &PageTable) -> Result<usize, MemError>;
}

/// Clean pages first (no write-back cost), then strict least-recently-used.
///
/// Both scans run in ascending page-index order, so ties deterministically
/// go to the lowest page index.
#[derive(Debug, Default)]
pub struct CleanFirstLru;

impl ReplacementPolicy for CleanFirstLru {
    fn select_victim(&mut self, table: &PageTable) -> Result<usize, MemError> {
        if let Some((page, _)) = table.iter().find(|(_, e)| e.valid() && !e.dirty()) {
            return Ok(page);
        }

        let mut victim = None;
        let mut oldest = u64::MAX;
        for (page, entry) in table.iter() {
            if entry.valid() && entry.last_access() < oldest {
                victim = Some(page);
                oldest = entry.last_access();
            }
        }
        victim.ok_or(MemError::InternalInconsistency(
            "no valid page to evict while every frame is occupied",
        ))
    }
}
