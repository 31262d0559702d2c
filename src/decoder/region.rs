// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{
    decoder::DecodeError,
    models::data_header::Region,
    reader::{PAGE_DWORDS, PageReader},
};

/// Fetch a `(start, size)` region of a log into a contiguous buffer.
///
/// Region offsets are relative to byte 0 of log page 1, so the region's
/// first page is `start / 128 + 1`. Regions may overlap each other and
/// the header; every region is copied out independently.
pub fn fetch_region<R: PageReader>(
    reader: &mut R,
    log_address: u8,
    region: Region,
) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(region.size_dword as usize * 4);
    if region.is_empty() {
        return Ok(out);
    }

    let first_page = region.start_dword / PAGE_DWORDS + 1;
    let last_page = region.end_dword().saturating_sub(1) / PAGE_DWORDS + 1;
    if last_page > u16::MAX as u64 {
        return Err(DecodeError::MalformedHeader {
            log_address,
            reason: format!(
                "region ({}, {}) extends beyond the addressable log pages",
                region.start_dword, region.size_dword
            ),
        });
    }

    let mut page_index = first_page as u16;
    let mut page_offset_dw = region.start_dword % PAGE_DWORDS;
    let mut remaining = region.size_dword;

    while remaining > 0 {
        let page = reader.read_page(log_address, page_index)?;
        let chunk = remaining.min(PAGE_DWORDS - page_offset_dw);
        let start = page_offset_dw as usize * 4;
        out.extend_from_slice(&page[start..start + chunk as usize * 4]);

        remaining -= chunk;
        page_index += 1;
        page_offset_dw = 0;
    }

    Ok(out)
}
