// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{
    decoder::DecodeError,
    models::{
        data_header::TelemetryDataHeader,
        strings_header::{STRINGS_HEADER_LEN, TelemetryStringsHeader},
    },
    reader::{LOG_CURRENT, LOG_SAVED, PAGE_DWORDS, PAGE_SIZE},
};

/// Floor for the region-extent scan. The telemetry data header always
/// occupies the front of area 1.
const DATA_HEADER_FLOOR: u64 = PAGE_SIZE as u64;

/// Pages needed to cover `max_dword` dwords of payload plus page 0.
///
/// The division truncates on purpose: a region ending exactly on a page
/// boundary is charged one page less than a strict ceiling would charge.
/// Keep it truncating, or legitimate blobs get rejected.
#[inline]
fn pages_needed(max_dword: u64) -> u64 {
    max_dword / PAGE_DWORDS + 1
}

/// Check the caller's sector budget against the region extents declared
/// by the Telemetry Data Header. Area 2 shadows area 1 in each pair:
/// area 1 only counts while area 2 is empty.
pub fn check_telemetry_budget(
    header: &TelemetryDataHeader,
    sector_budget: u32,
) -> Result<(), DecodeError> {
    let mut max_dword = DATA_HEADER_FLOOR;

    if !header.statistic2.is_empty() && header.statistic2.end_dword() > max_dword {
        max_dword = header.statistic2.end_dword();
    } else if !header.statistic1.is_empty() && header.statistic1.end_dword() > max_dword {
        max_dword = header.statistic1.end_dword();
    }

    if !header.event_fifo2.is_empty() && header.event_fifo2.end_dword() > max_dword {
        max_dword = header.event_fifo2.end_dword();
    } else if !header.event_fifo1.is_empty() && header.event_fifo1.end_dword() > max_dword
    {
        max_dword = header.event_fifo1.end_dword();
    }

    let needed = pages_needed(max_dword);
    if (sector_budget as u64) < needed {
        return Err(DecodeError::Truncated {
            log_address: LOG_CURRENT,
            budget: sector_budget,
            needed,
        });
    }
    Ok(())
}

/// Check the sector budget of log 0x25 against the header plus the four
/// string tables, which follow it with no gaps.
pub fn check_strings_budget(
    header: &TelemetryStringsHeader,
    sector_budget: u32,
) -> Result<(), DecodeError> {
    let table_dwords = header
        .statistics_id_table
        .size_dword
        .saturating_add(header.event_table.size_dword)
        .saturating_add(header.vu_event_table.size_dword)
        .saturating_add(header.ascii_table.size_dword);

    let needed = pages_needed(table_dwords + (STRINGS_HEADER_LEN / 4) as u64);
    if (sector_budget as u64) < needed {
        return Err(DecodeError::Truncated {
            log_address: LOG_SAVED,
            budget: sector_budget,
            needed,
        });
    }
    Ok(())
}
