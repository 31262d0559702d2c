// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::{Result, anyhow};
use zerocopy::{
    FromBytes, Immutable, KnownLayout, Unaligned,
    byteorder::{LittleEndian, U16},
};

use crate::models::statistic::Statistic;

/// Size of the event descriptor header in bytes.
pub const EVENT_HEADER_LEN: usize = 4;

/// Size of a SATA FIS payload carried by class 0x0D events.
pub const FIS_LEN: usize = 28;

/// Defined debug event classes. Class 0 is the end-of-FIFO sentinel and
/// classes >= 0x80 are vendor unique.
pub mod class {
    pub const TIMESTAMP: u8 = 0x01;
    pub const RESET: u8 = 0x04;
    pub const BOOT_SEQ: u8 = 0x05;
    pub const FIRMWARE_ASSERT: u8 = 0x06;
    pub const TEMPERATURE: u8 = 0x07;
    pub const MEDIA: u8 = 0x08;
    pub const MEDIA_WEAR: u8 = 0x09;
    pub const STATISTIC_SNAP: u8 = 0x0a;
    pub const VIRTUAL_FIFO: u8 = 0x0b;
    pub const SATA_PHY_LINK: u8 = 0x0c;
    pub const SATA_TRANSPORT: u8 = 0x0d;
    pub const SAS_PHY_LINK: u8 = 0x0e;
    pub const SAS_TRANSPORT: u8 = 0x0f;
    pub const VENDOR_UNIQUE_BASE: u8 = 0x80;
}

/// Raw event descriptor header (4 bytes).
///
/// Section 7.2.8.1 in OCP Datacenter SAS-SATA Device Specification v1.5.
/// `data_size` counts the dwords of the body, except for class 0x0A whose
/// length is recovered from the embedded statistic descriptor header.
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Unaligned)]
pub struct EventHeaderRaw {
    pub debug_event_class: u8,
    pub event_id: U16<LittleEndian>,
    pub data_size: u8,
}

impl EventHeaderRaw {
    pub fn parse(buf: &[u8]) -> Result<&Self> {
        let (raw, _rest) = Self::ref_from_prefix(buf).map_err(|_| {
            anyhow!(
                "event descriptor header: need >= {EVENT_HEADER_LEN} bytes, got {}",
                buf.len()
            )
        })?;
        Ok(raw)
    }
}

/// Human name of a debug event class.
pub fn class_name(dbg_class: u8) -> String {
    match dbg_class {
        class::TIMESTAMP => "Timestamp Class".into(),
        class::RESET => "Reset Class".into(),
        class::BOOT_SEQ => "Boot Sequence Class".into(),
        class::FIRMWARE_ASSERT => "Firmware Assert Class".into(),
        class::TEMPERATURE => "Temperature Class".into(),
        class::MEDIA => "Media Class".into(),
        class::MEDIA_WEAR => "Media Wear Class".into(),
        class::STATISTIC_SNAP => "Statistic Snapshot Class".into(),
        class::VIRTUAL_FIFO => "Virtual FIFO Event Class".into(),
        class::SATA_PHY_LINK => "SATA Phy/Link Class".into(),
        class::SATA_TRANSPORT => "SATA Transport Class".into(),
        class::SAS_PHY_LINK => "SAS Phy/Link Class".into(),
        class::SAS_TRANSPORT => "SAS Transport Class".into(),
        other if other >= class::VENDOR_UNIQUE_BASE => {
            format!("Vendor Unique Class {other:02x}")
        },
        other => format!("Unknown Class {other:02x}"),
    }
}

/// Class-specific portion of a decoded event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventBody {
    /// Class 0x01: 8-byte little-endian timestamp.
    Timestamp { millis: u64 },
    /// Class 0x09 with event id 0: three wear counters.
    MediaWear {
        host_tb_written: u32,
        media_tb_written: u32,
        ssd_media_tb_erased: u32,
    },
    /// Class 0x0A: the embedded statistic descriptor. `None` when the
    /// embedded descriptor itself was malformed.
    StatisticSnapshot(Option<Box<Statistic>>),
    /// Class 0x0B: virtual FIFO marker split into data area and number.
    VirtualFifo {
        data_area: u8,
        number: u16,
        name: Option<String>,
    },
    /// Class 0x0D: raw FIS payload.
    SataFis { fis: [u8; FIS_LEN] },
    /// No class-specific body.
    None,
}

/// Vendor-unique tail carried by events of classes below 0x80.
#[derive(Debug, Clone, PartialEq)]
pub struct VuTail {
    pub id: Option<u16>,
    pub name: Option<String>,
    pub data: Vec<u8>,
}

/// A fully decoded event descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub dbg_class: u8,
    pub class_name: String,
    pub id: u16,
    /// Resolved event name; statistic-snapshot events carry none.
    pub name: Option<String>,
    pub body: EventBody,
    pub vu: Option<VuTail>,
}
