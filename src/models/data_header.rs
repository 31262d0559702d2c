// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::{Result, anyhow};
use tracing::warn;
use zerocopy::{
    FromBytes, Immutable, KnownLayout, Unaligned,
    byteorder::{LittleEndian, U16, U64},
};

use crate::{
    reader::PAGE_SIZE,
    utils::{GUID_LEN, ata_id_string, guid_to_str},
};

/// A `(start, size)` pair in dwords locating one region of log 0x24.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start_dword: u64,
    pub size_dword: u64,
}

impl Region {
    /// End of the region in dwords, saturating on corrupt headers.
    #[inline]
    pub fn end_dword(&self) -> u64 {
        self.start_dword.saturating_add(self.size_dword)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size_dword == 0
    }
}

/// Raw OCP Telemetry Data Header, 512 bytes at log 0x24 page 1 byte 0.
///
/// Section 7.2.10 in OCP Datacenter SAS-SATA Device Specification v1.5.
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct TelemetryDataHeaderRaw {
    pub major_version: U16<LittleEndian>,
    pub minor_version: U16<LittleEndian>,
    reserved1: [u8; 4],
    pub timestamp: [u8; 6],
    pub timestamp_info: U16<LittleEndian>,
    pub guid: [u8; GUID_LEN],
    pub device_string_data_size: U16<LittleEndian>,
    pub firmware_version: [u8; 8],
    reserved2: [u8; 68],
    pub statistic1_start_dword: U64<LittleEndian>,
    pub statistic1_size_dword: U64<LittleEndian>,
    pub statistic2_start_dword: U64<LittleEndian>,
    pub statistic2_size_dword: U64<LittleEndian>,
    pub event1_fifo_start_dword: U64<LittleEndian>,
    pub event1_fifo_size_dword: U64<LittleEndian>,
    pub event2_fifo_start_dword: U64<LittleEndian>,
    pub event2_fifo_size_dword: U64<LittleEndian>,
    reserved3: [u8; 338],
}

/// Parse the Telemetry Data Header from a 512-byte log page.
pub fn parse_data_header(page: &[u8]) -> Result<&TelemetryDataHeaderRaw> {
    let (raw, _rest) = TelemetryDataHeaderRaw::ref_from_prefix(page).map_err(|_| {
        anyhow!(
            "Telemetry Data Header: need >= {PAGE_SIZE} bytes, got {}",
            page.len()
        )
    })?;
    Ok(raw)
}

/// Normalise the 6-byte timestamp using the protocol field of
/// `timestamp_info` (bits 5..4).
///
/// Protocol 1 is SAS and big-endian, protocol 2 is SATA and little-endian.
/// Any other protocol yields 0 and a diagnostic. The value is milliseconds
/// since the Unix epoch.
pub fn timestamp_millis(timestamp: &[u8; 6], timestamp_info: u16) -> (u64, Option<String>) {
    let protocol = (timestamp_info >> 4) & 0x3;
    match protocol {
        1 => {
            let high = u32::from_be_bytes([
                timestamp[0],
                timestamp[1],
                timestamp[2],
                timestamp[3],
            ]) as u64;
            let low = u16::from_be_bytes([timestamp[4], timestamp[5]]) as u64;
            ((high << 16) | low, None)
        },
        2 => {
            let high = u32::from_le_bytes([
                timestamp[2],
                timestamp[3],
                timestamp[4],
                timestamp[5],
            ]) as u64;
            let low = u16::from_le_bytes([timestamp[0], timestamp[1]]) as u64;
            ((high << 16) | low, None)
        },
        other => {
            let diag = format!("unknown timestamp protocol ({other})");
            warn!("{diag}");
            (0, Some(diag))
        },
    }
}

/// Decoded Telemetry Data Header kept for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryDataHeader {
    pub major_version: u16,
    pub minor_version: u16,
    pub timestamp_millis: u64,
    pub guid: String,
    pub device_string_data_size: u16,
    pub firmware_version: String,
    pub statistic1: Region,
    pub statistic2: Region,
    pub event_fifo1: Region,
    pub event_fifo2: Region,
}

impl TelemetryDataHeader {
    /// Decode the raw header; a timestamp-protocol anomaly is returned as
    /// a diagnostic rather than a failure.
    pub fn decode(raw: &TelemetryDataHeaderRaw) -> (Self, Option<String>) {
        let (millis, diag) = timestamp_millis(&raw.timestamp, raw.timestamp_info.get());
        let header = TelemetryDataHeader {
            major_version: raw.major_version.get(),
            minor_version: raw.minor_version.get(),
            timestamp_millis: millis,
            guid: guid_to_str(&raw.guid),
            device_string_data_size: raw.device_string_data_size.get(),
            firmware_version: ata_id_string(&raw.firmware_version),
            statistic1: Region {
                start_dword: raw.statistic1_start_dword.get(),
                size_dword: raw.statistic1_size_dword.get(),
            },
            statistic2: Region {
                start_dword: raw.statistic2_start_dword.get(),
                size_dword: raw.statistic2_size_dword.get(),
            },
            event_fifo1: Region {
                start_dword: raw.event1_fifo_start_dword.get(),
                size_dword: raw.event1_fifo_size_dword.get(),
            },
            event_fifo2: Region {
                start_dword: raw.event2_fifo_start_dword.get(),
                size_dword: raw.event2_fifo_size_dword.get(),
            },
        };
        (header, diag)
    }
}
