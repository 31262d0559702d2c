//! Log page access. The decoder only ever sees the [`PageReader`] trait;
//! transports live behind it.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use thiserror::Error;

/// File-backed page reader over raw log dumps.
pub mod file;
/// In-memory page reader for tests and synthesised blobs.
pub mod mem;

/// Size of one ATA log page in bytes.
pub const PAGE_SIZE: usize = 512;

/// Dwords per log page.
pub const PAGE_DWORDS: u64 = 128;

/// GP log address of the Current Device Internal Status log.
pub const LOG_CURRENT: u8 = 0x24;

/// GP log address of the Saved Device Internal Status log.
pub const LOG_SAVED: u8 = 0x25;

#[derive(Debug, Error)]
#[error("failed to read log {log_address:#04x} page {page_index}: {source}")]
pub struct ReadPageError {
    pub log_address: u8,
    pub page_index: u16,
    #[source]
    pub source: std::io::Error,
}

/// Access to 512-byte pages of a GP log. Page 0 holds the Internal
/// Status Header. No caching, no retry; failures carry the address of
/// the page that could not be produced.
pub trait PageReader {
    fn read_page(
        &mut self,
        log_address: u8,
        page_index: u16,
    ) -> Result<[u8; PAGE_SIZE], ReadPageError>;
}
