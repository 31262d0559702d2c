// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Well-known identifier names from the OCP Datacenter SAS-SATA Device
//! Specification v1.5. These tables win over the device's own strings.

use crate::models::event::class;

/// Built-in statistic names, sorted by id for binary search.
static BUILTIN_STATISTIC_NAMES: [(u16, &str); 78] = [
    (0x0002, "ATA Log"),
    (0x0003, "SCSI Log Page"),
    (0x2001, "Reallocated Block Count"),
    (0x2002, "Pending Defects Count"),
    (0x2003, "Power-on Hours Count"),
    (0x2004, "Power-on Cycle Count"),
    (0x2005, "Spare Blocks Used"),
    (0x2006, "Spare Blocks Remaining"),
    (0x2007, "Unexpected Power Loss Count"),
    (0x2008, "Current Temperature"),
    (0x2009, "Minimum Lifetime Temperature"),
    (0x200a, "Maximum Lifetime Temperature"),
    (0x200b, "Uncorrectable Read Error Count"),
    (0x200c, "Background Uncorrectable Read Error Count"),
    (0x200d, "Interface CRC Error Count"),
    (0x200e, "Volatile Memory Backup Source Failure"),
    (0x200f, "Read Only Mode"),
    (0x2010, "Host Write Commands"),
    (0x2011, "Host Read Commands"),
    (0x2012, "Logical Blocks Read"),
    (0x2013, "Logical Blocks Written"),
    (0x2014, "Total Media Writes"),
    (0x2015, "Total Media Reads"),
    (0x2016, "Soft ECC Error Count"),
    (0x2017, "Host Trim/Unmap Commands"),
    (0x2018, "End-to-end Detected Errors"),
    (0x2019, "End-to-end Corrected Errors"),
    (0x201a, "Unaligned I/O count"),
    (0x201b, "Security version number"),
    (0x201c, "Thermal Throttling Status"),
    (0x201d, "Thermal Throttling Count"),
    (0x201e, "DSS Specification Version"),
    (0x201f, "Incomplete Shutdown Count"),
    (0x2020, "Percent Free Blocks"),
    (0x2021, "Lowest Permitted Firmware Revision"),
    (0x2022, "Maximum Peak Power Capability"),
    (0x2023, "Current Maximum Average Power"),
    (0x2024, "Lifetime Power Consumed"),
    (0x2025, "Power Changes"),
    (0x2026, "Phy Reinitialization Count"),
    (0x2027, "Secondary Phy Reinitialization Count"),
    (0x2028, "Command Timeouts"),
    (0x2029, "Hardware Revision"),
    (0x202a, "Firmware Revision"),
    (0x4001, "Raw Capacity"),
    (0x4002, "User Capacity"),
    (0x4003, "Erase Count"),
    (0x4004, "Erase Fail Count"),
    (0x4005, "Maximum Erase Count"),
    (0x4006, "Average Erase Count"),
    (0x4007, "Program Fail Count"),
    (0x4008, "XOR Recovery Count"),
    (0x4009, "Percent Device Life Remaining"),
    (0x400a, "Lifetime Erase Count"),
    (0x400b, "Bad User NAND Blocks"),
    (0x400c, "Bad System NAND Blocks"),
    (0x400d, "Minimum Erase Count"),
    (0x400e, "Power Loss Protection Start Count"),
    (0x400f, "System Data Percent Used"),
    (0x4010, "Power Loss Protection Health"),
    (0x4011, "Endurance Estimate"),
    (0x4012, "Percent User Spare Available"),
    (0x4013, "Percent System Spare Available"),
    (0x4014, "Total Media Dies"),
    (0x4015, "Media Die Failure Tolerance"),
    (0x4016, "Media Dies Offline"),
    (0x4017, "System Area Program Fail Count"),
    (0x4018, "System Area Program Fail Percentage Remaining"),
    (0x4019, "System Area Uncorrectable Read Error Count"),
    (0x401a, "System Area Uncorrectable Read Percentage Remaining"),
    (0x401b, "System Area Erase Fail Count"),
    (0x401c, "System Area Erase Fail Percentage Remaining"),
    (0x6001, "Start/Stop Count"),
    (0x6002, "Load Cycle Count"),
    (0x6003, "Shock Overlimit Count"),
    (0x6004, "Head Flying Hours"),
    (0x6005, "Free Fall Events Count"),
    (0x6006, "Spinup Times"),
];

/// Look up a statistic id in the built-in table.
pub fn builtin_statistic_name(id: u16) -> Option<&'static str> {
    BUILTIN_STATISTIC_NAMES
        .binary_search_by_key(&id, |&(key, _)| key)
        .ok()
        .map(|idx| BUILTIN_STATISTIC_NAMES[idx].1)
}

static TIMESTAMP_EVENTS: [&str; 3] = [
    "Host Initiated Timestamp",
    "Firmware Initiated Timestamp",
    "Obsolete ID (0x02)",
];

static RESET_EVENTS: [&str; 9] = [
    "Main Power Cycle",
    "SATA - SRST",
    "SATA - COMRESET",
    "SAS - Hard Reset",
    "SAS - COMINIT",
    "SAS - DWORD Synchronization Loss",
    "SAS - SPL Packet Synchronization Loss",
    "SAS - Receive Identify Timeout Timer Expired",
    "SAS - Hot-plug Timeout",
];

static SSD_BOOT_SEQ_EVENTS: [&str; 4] = [
    "Main Firmware Boot Complete",
    "FTL Load From NVM Complete",
    "FTL Rebuild Started",
    "FTL Ready",
];

static HDD_BOOT_SEQ_EVENTS: [&str; 4] = [
    "Main Firmware Boot Complete",
    "Spin-up Start",
    "Spin-up Complete",
    "Device Ready",
];

/// First id of the HDD half of the boot-sequence table.
const HDD_BOOT_SEQ_BASE: u16 = 0x100;

static FW_ASSERT_EVENTS: [&str; 8] = [
    "Assert in SAS, SCSI, SATA or ATA Processing Code",
    "Assert in Media Code",
    "Assert in Security Code",
    "Assert in Background Services Code",
    "FTL Rebuild Failed",
    "FTL Data Mismatch",
    "Assert in Bad Block Relocation Code",
    "Assert in Other Code",
];

static TEMPERATURE_EVENTS: [&str; 3] = [
    "Temperature decrease ceased thermal throttling",
    "Temperature increase commenced thermal throttling",
    "Temperature increase caused thermal shutdown",
];

static MEDIA_EVENTS: [&str; 8] = [
    "XOR (or equivalent) Recovery Invoked",
    "Uncorrectable Media Error",
    "Block Marked Bad Due To SSD Media Program Error",
    "Block Marked Bad Due To SSD Media Erase Error",
    "Block Marked Bad Due To Read Error",
    "SSD Media Plane Failure",
    "SSD Media Die Failure",
    "HDD Head or Surface Failure",
];

static MEDIA_WEAR_EVENTS: [&str; 1] = ["Media Wear"];

// Virtual FIFO names beyond Start/End live in the VU event string table,
// keyed by the FIFO marker.
static VIRTUAL_FIFO_EVENTS: [&str; 2] = ["Virtual FIFO Start", "Virtual FIFO End"];

static SATA_PHY_LINK_EVENTS: [&str; 17] = [
    "DR_Reset Entered due to Unexpected COMRESET",
    "DR_Reset Entered due to Phy Signal Not Detected",
    "Device Dropped Link while Host Link is Up",
    "DR_Ready entered at Gen 3",
    "DR_Ready entered at Gen 2",
    "DR_Ready entered at Gen 1",
    "DR_Partial Entered",
    "DR_Partial Exited",
    "DR_Reduce_Speed Entered",
    "DR_Error Entered",
    "Transmitting HOLD",
    "Receiving HOLD",
    "PMNAK Received",
    "PMNAK Transmitted",
    "R_ERR Received",
    "R_ERR Transmitted",
    "Set Device Bits Transmitted with Error Bit Set",
];

static SATA_TRANSPORT_EVENTS: [&str; 4] = [
    "Non-Data FIS Received",
    "Non-Data FIS Transmitted",
    "Data FIS Received",
    "Data FIS Transmitted",
];

static SAS_PHY_LINK_EVENTS: [&str; 13] = [
    "Link Up - 1.5 Gbps",
    "Link Up - 3.0 Gbps",
    "Link Up - 6.0 Gbps",
    "Link Up - 12.0 Gbps",
    "Link Up - 22.5 Gbps",
    "Identify Received (Data)",
    "HARD_RESET Received",
    "Link Loss",
    "DWORD Synchronization Loss",
    "SPL Packet Synchronization Loss",
    "Identify Receive TImeout",
    "BREAK Received",
    "BREAK_REPLY Received",
];

static SAS_TRANSPORT_EVENTS: [&str; 9] = [
    "DATA Frame Received",
    "DATA Frame Sent",
    "XFER_RDY Frame Sent",
    "COMMAND Frame Received",
    "RESPONSE Frame Sent",
    "TASK Frame Received",
    "SSP Frame Received",
    "SSP Frame Sent",
    "NAK Received",
];

/// Look up an event id in the built-in table of its debug class.
pub fn builtin_event_name(dbg_class: u8, event_id: u16) -> Option<&'static str> {
    if dbg_class == class::BOOT_SEQ {
        // the table is split: SSD ids from 0, HDD ids from 0x100
        return if event_id < HDD_BOOT_SEQ_BASE {
            SSD_BOOT_SEQ_EVENTS.get(event_id as usize).copied()
        } else {
            HDD_BOOT_SEQ_EVENTS
                .get((event_id - HDD_BOOT_SEQ_BASE) as usize)
                .copied()
        };
    }

    let table: &[&str] = match dbg_class {
        class::TIMESTAMP => &TIMESTAMP_EVENTS,
        class::RESET => &RESET_EVENTS,
        class::FIRMWARE_ASSERT => &FW_ASSERT_EVENTS,
        class::TEMPERATURE => &TEMPERATURE_EVENTS,
        class::MEDIA => &MEDIA_EVENTS,
        class::MEDIA_WEAR => &MEDIA_WEAR_EVENTS,
        class::VIRTUAL_FIFO => &VIRTUAL_FIFO_EVENTS,
        class::SATA_PHY_LINK => &SATA_PHY_LINK_EVENTS,
        class::SATA_TRANSPORT => &SATA_TRANSPORT_EVENTS,
        class::SAS_PHY_LINK => &SAS_PHY_LINK_EVENTS,
        class::SAS_TRANSPORT => &SAS_TRANSPORT_EVENTS,
        _ => return None,
    };
    table.get(event_id as usize).copied()
}
