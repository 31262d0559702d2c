// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::{Result, anyhow};
use zerocopy::{
    FromBytes, Immutable, KnownLayout, Unaligned,
    byteorder::{LittleEndian, U16, U64},
};

use crate::{
    models::data_header::Region,
    utils::{GUID_LEN, guid_to_str, trim_ascii_field},
};

/// Length of the two event FIFO name fields.
pub const FIFO_NAME_LEN: usize = 16;

/// Size of the strings header in bytes.
pub const STRINGS_HEADER_LEN: usize = 432;

/// Raw OCP Telemetry Strings Header at log 0x25 page 1 byte 0.
///
/// Section 7.2.13 in OCP Datacenter SAS-SATA Device Specification v1.5.
/// The four string tables follow the header with no gaps, in the order
/// (statistics-id, event, vu-event, ascii).
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct TelemetryStringsHeaderRaw {
    pub log_page_version: u8,
    reserved1: [u8; 15],
    pub guid: [u8; GUID_LEN],
    reserved2: [u8; 32],
    pub statistics_id_string_table_start: U64<LittleEndian>,
    pub statistics_id_string_table_size: U64<LittleEndian>,
    pub event_string_table_start: U64<LittleEndian>,
    pub event_string_table_size: U64<LittleEndian>,
    pub vu_event_string_table_start: U64<LittleEndian>,
    pub vu_event_string_table_size: U64<LittleEndian>,
    pub ascii_table_start: U64<LittleEndian>,
    pub ascii_table_size: U64<LittleEndian>,
    pub event_fifo_1_name: [u8; FIFO_NAME_LEN],
    pub event_fifo_2_name: [u8; FIFO_NAME_LEN],
    reserved3: [u8; 272],
}

/// Parse the Telemetry Strings Header from the front of a log page.
pub fn parse_strings_header(page: &[u8]) -> Result<&TelemetryStringsHeaderRaw> {
    let (raw, _rest) = TelemetryStringsHeaderRaw::ref_from_prefix(page).map_err(|_| {
        anyhow!(
            "Telemetry Strings Header: need >= {STRINGS_HEADER_LEN} bytes, got {}",
            page.len()
        )
    })?;
    Ok(raw)
}

/// Decoded Telemetry Strings Header kept for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryStringsHeader {
    pub log_page_version: u8,
    pub guid: String,
    pub statistics_id_table: Region,
    pub event_table: Region,
    pub vu_event_table: Region,
    pub ascii_table: Region,
    pub event_fifo_1_name: String,
    pub event_fifo_2_name: String,
}

impl From<&TelemetryStringsHeaderRaw> for TelemetryStringsHeader {
    fn from(raw: &TelemetryStringsHeaderRaw) -> Self {
        TelemetryStringsHeader {
            log_page_version: raw.log_page_version,
            guid: guid_to_str(&raw.guid),
            statistics_id_table: Region {
                start_dword: raw.statistics_id_string_table_start.get(),
                size_dword: raw.statistics_id_string_table_size.get(),
            },
            event_table: Region {
                start_dword: raw.event_string_table_start.get(),
                size_dword: raw.event_string_table_size.get(),
            },
            vu_event_table: Region {
                start_dword: raw.vu_event_string_table_start.get(),
                size_dword: raw.vu_event_string_table_size.get(),
            },
            ascii_table: Region {
                start_dword: raw.ascii_table_start.get(),
                size_dword: raw.ascii_table_size.get(),
            },
            event_fifo_1_name: trim_ascii_field(&raw.event_fifo_1_name),
            event_fifo_2_name: trim_ascii_field(&raw.event_fifo_2_name),
        }
    }
}

/// Statistics Identifier String Table entry (16 bytes).
///
/// Keys a vendor-unique statistic id to a slice of the ASCII table.
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct StatisticIdStringEntryRaw {
    pub vu_statistic_id: U16<LittleEndian>,
    reserved1: u8,
    pub ascii_id_len: u8,
    pub ascii_id_offset: U64<LittleEndian>,
    reserved2: [u8; 4],
}

/// Event Identifier / VU Event Identifier String Table entry (16 bytes).
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct EventIdStringEntryRaw {
    pub dbg_class: u8,
    pub event_id: U16<LittleEndian>,
    pub ascii_id_len: u8,
    pub ascii_id_offset: U64<LittleEndian>,
    reserved: [u8; 4],
}

/// Size of one string-table entry in bytes (both tables).
pub const STRING_ENTRY_LEN: usize = 16;

/// Key of the flat event-name map: `class << 16 | event_id`.
#[inline]
pub fn event_key(dbg_class: u8, event_id: u16) -> u32 {
    ((dbg_class as u32) << 16) | event_id as u32
}
