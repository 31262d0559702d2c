// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::{Result, anyhow};
use zerocopy::{
    FromBytes, Immutable, KnownLayout, Unaligned,
    byteorder::{LittleEndian, U16, U32},
};

use crate::reader::PAGE_SIZE;

bitflags::bitflags! {
    /// Validity bits of the Reason ID substructure.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct ReasonIdFlags: u8 {
        const LINE_NUMBER = 0x01;
        const FILE_ID     = 0x02;
        const ERROR_ID    = 0x04;
        const VU_EXT      = 0x08;
    }
}

/// Raw Reason ID, 128 bytes inside the Internal Status Header.
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct ReasonIdRaw {
    pub error_id: [u8; 64],
    pub file_id: [u8; 8],
    pub line_number: U16<LittleEndian>,
    pub valid_flags: u8,
    reserved: [u8; 21],
    pub vu_reason_extension: [u8; 32],
}

/// Raw Device Internal Status log page 0 (both log 0x24 and log 0x25).
///
/// Areas 1..3 locate the OCP telemetry payload inside the log; a zero
/// area-1 last page means the device has nothing to report.
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct InternalStatusRaw {
    pub log_address: u8,
    reserved1: [u8; 3],
    pub organization_id: U32<LittleEndian>,
    pub area1_last_log_page: U16<LittleEndian>,
    pub area2_last_log_page: U16<LittleEndian>,
    pub area3_last_log_page: U16<LittleEndian>,
    reserved2: [u8; 368],
    pub saved_data_available: u8,
    pub saved_data_generation_number: u8,
    pub reason_id: ReasonIdRaw,
}

/// Parse an Internal Status page from a 512-byte log page.
pub fn parse_internal_status(page: &[u8]) -> Result<&InternalStatusRaw> {
    let (raw, _rest) = InternalStatusRaw::ref_from_prefix(page).map_err(|_| {
        anyhow!(
            "Internal Status Header: need >= {PAGE_SIZE} bytes, got {}",
            page.len()
        )
    })?;
    Ok(raw)
}

/// Decoded Reason ID.
#[derive(Debug, Clone, PartialEq)]
pub struct ReasonId {
    pub valid_flags: ReasonIdFlags,
    pub error_id: [u8; 64],
    pub file_id: [u8; 8],
    pub line_number: u16,
    pub vu_reason_extension: [u8; 32],
}

/// Decoded Internal Status Header kept for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct InternalStatus {
    pub log_address: u8,
    pub organization_id: u32,
    pub area1_last_log_page: u16,
    pub area2_last_log_page: u16,
    pub area3_last_log_page: u16,
    pub saved_data_available: bool,
    pub saved_data_generation_number: u8,
    pub reason_id: ReasonId,
}

impl From<&InternalStatusRaw> for InternalStatus {
    fn from(raw: &InternalStatusRaw) -> Self {
        InternalStatus {
            log_address: raw.log_address,
            organization_id: raw.organization_id.get(),
            area1_last_log_page: raw.area1_last_log_page.get(),
            area2_last_log_page: raw.area2_last_log_page.get(),
            area3_last_log_page: raw.area3_last_log_page.get(),
            saved_data_available: raw.saved_data_available != 0,
            saved_data_generation_number: raw.saved_data_generation_number,
            reason_id: ReasonId {
                // upper nibble is reserved
                valid_flags: ReasonIdFlags::from_bits_truncate(
                    raw.reason_id.valid_flags & 0x0f,
                ),
                error_id: raw.reason_id.error_id,
                file_id: raw.reason_id.file_id,
                line_number: raw.reason_id.line_number.get(),
                vu_reason_extension: raw.reason_id.vu_reason_extension,
            },
        }
    }
}
