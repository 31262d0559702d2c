// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::{Result, anyhow};
use thiserror::Error;
use zerocopy::{
    FromBytes, Immutable, KnownLayout, Unaligned,
    byteorder::{LittleEndian, U16},
};

/// Size of the statistic descriptor header in bytes.
pub const STAT_HEADER_LEN: usize = 8;

/// Size of the ARRAY body prelude (element size / element count) in bytes.
pub const ARRAY_HEADER_LEN: usize = 4;

/// Raw statistic descriptor header (8 bytes).
///
/// Section 7.2.3 in OCP Datacenter SAS-SATA Device Specification v1.5.
/// `statistic_data_size` counts the dwords of the body that follows.
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct StatisticHeaderRaw {
    pub statistics_id: U16<LittleEndian>,
    pub statistics_info: [u8; 3],
    reserved: u8,
    pub statistic_data_size: U16<LittleEndian>,
}

impl StatisticHeaderRaw {
    pub fn parse(buf: &[u8]) -> Result<&Self> {
        let (raw, _rest) = Self::ref_from_prefix(buf).map_err(|_| {
            anyhow!(
                "statistic descriptor header: need >= {STAT_HEADER_LEN} bytes, got {}",
                buf.len()
            )
        })?;
        Ok(raw)
    }
}

/// Raw ARRAY body prelude. Both counts are stored off-by-one: the wire
/// value 0 means one element / one byte.
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct ArrayHeaderRaw {
    pub element_size: u8,
    pub reserved: u8,
    pub number_of_elements: U16<LittleEndian>,
}

#[derive(Debug, Error)]
#[error("reserved statistic type: {0:#x}")]
pub struct UnknownStatType(pub u8);

#[derive(Debug, Error)]
#[error("reserved data type: {0:#x}")]
pub struct UnknownDataType(pub u8);

/// Statistic type, high nibble of info byte 0.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StatType {
    #[default]
    Single = 0,
    Array = 1,
    Custom = 2,
}

impl StatType {
    pub fn from_info(info_0: u8) -> Result<Self, UnknownStatType> {
        match (info_0 >> 4) & 0xf {
            0 => Ok(StatType::Single),
            1 => Ok(StatType::Array),
            2 => Ok(StatType::Custom),
            other => Err(UnknownStatType(other)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StatType::Single => "Single",
            StatType::Array => "Array",
            StatType::Custom => "Custom",
        }
    }
}

/// Data type, low nibble of info byte 2.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    #[default]
    Na = 0,
    Int = 1,
    Uint = 2,
    Fp = 3,
    Ascii = 4,
}

impl DataType {
    pub fn from_info(info_2: u8) -> Result<Self, UnknownDataType> {
        match info_2 & 0xf {
            0 => Ok(DataType::Na),
            1 => Ok(DataType::Int),
            2 => Ok(DataType::Uint),
            3 => Ok(DataType::Fp),
            4 => Ok(DataType::Ascii),
            other => Err(UnknownDataType(other)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataType::Na => "No Data Type Information",
            DataType::Int => "Signed Integer",
            DataType::Uint => "Unsigned Integer",
            DataType::Fp => "Floating Point",
            DataType::Ascii => "ASCII (7-bit)",
        }
    }
}

/// Behaviour type, low nibble of info byte 0. Reserved values are kept
/// raw and render as "Reserved".
pub fn behavior_name(behavior: u8) -> &'static str {
    match behavior {
        0 => "N/A",
        1 => "Runtime Value",
        2 => "Reset Persistent, Power Cycle Resistent",
        3 => "Saturating Counter, Reset Persistent",
        4 => "Saturating Counter, Reset Persistent, Power Cycle Resistent",
        5 => "Saturating Counter",
        6 => "Reset Persistent",
        _ => "Reserved",
    }
}

/// Highest defined unit enum value (Angstroms).
pub const UNIT_TYPE_MAX: u8 = 0x12;

const UNIT_NAMES: [&str; UNIT_TYPE_MAX as usize + 1] = [
    "N/A",
    "ms",
    "s",
    "h",
    "d",
    "MB",
    "GB",
    "TB",
    "PB",
    "C",
    "K",
    "F",
    "mV",
    "mA",
    "Ohm",
    "RPM",
    "micrometer",
    "nanometer",
    "angstroms",
];

pub fn unit_name(unit: u8) -> &'static str {
    UNIT_NAMES
        .get(unit as usize)
        .copied()
        .unwrap_or("Reserved")
}

/// Host hint type, bits 5..4 of info byte 2.
pub fn host_hint_name(hint: u8) -> &'static str {
    match hint {
        0 => "No Host Hint",
        1 => "Host Hint Type 1",
        _ => "Reserved",
    }
}

/// One decoded statistic value.
#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    Int(i64),
    Uint(u64),
    Ascii(String),
    /// FP and NA payloads are carried as raw bytes.
    Raw(Vec<u8>),
}

/// Decoded body of a statistic descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum StatData {
    Single(StatValue),
    Array(Vec<StatValue>),
    /// Custom statistic 0x0002: captured ATA log pages.
    AtaLog {
        log_addr: u8,
        log_page_count: u8,
        initial_log_page: u16,
        pages: Vec<Vec<u8>>,
    },
    /// Custom statistic 0x0003: captured SCSI log page.
    ScsiLogPage {
        log_page: u8,
        log_subpage: u8,
        data: Vec<u8>,
    },
    /// Custom statistic 0x6006: HDD spin-up times. Zero slots mean
    /// "absent" and are suppressed by the reporter.
    HddSpinup {
        spinup_max: u16,
        spinup_min: u16,
        spinup_hist: [u16; 10],
    },
    /// Any other custom id: generic value per the declared data type.
    Custom(StatValue),
}

/// A fully decoded statistic descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistic {
    pub id: u16,
    pub name: String,
    pub stat_type: StatType,
    pub behavior: u8,
    pub unit: u8,
    pub host_hint: u8,
    pub data_type: DataType,
    pub data_size_dwords: u16,
    pub data: StatData,
}
