// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use ocp_telemetry_rs::{
    decoder::{DecodeError, decode_strings, decode_telemetry},
    models::statistic::{StatData, StatValue},
    reader::{LOG_CURRENT, LOG_SAVED, mem::MemLogReader},
    strings::StringsCatalog,
};

use crate::unit_tests::common::{
    StringsLogBuilder, TelemetryLogBuilder, event_desc, internal_status_page, stat_single,
};

fn with_sentinel(mut payload: Vec<u8>) -> Vec<u8> {
    payload.extend_from_slice(&[0u8; 8]);
    payload
}

#[test]
fn test_minimal_sata_blob() -> Result<()> {
    // strings log with zero tables; telemetry log with one statistic at
    // (dword 128, 4 dwords): id 0x2003, SINGLE/UINT, value 12345
    let strings_blob = StringsLogBuilder::new().build();
    // one 12-byte descriptor plus a zero pad dword; the walk stops at
    // the region end
    let mut payload = stat_single(0x2003, 2, &12345u32.to_le_bytes());
    payload.extend_from_slice(&[0u8; 4]);
    let telemetry_blob = TelemetryLogBuilder::new()
        .timestamp([0x01, 0x02, 0x03, 0x04, 0x05, 0x06], 0x0020)
        .statistics1(payload)
        .build();

    let mut reader = MemLogReader::new()
        .insert(LOG_SAVED, strings_blob)
        .insert(LOG_CURRENT, telemetry_blob);

    let catalog = decode_strings(&mut reader, 8)?;
    let report = decode_telemetry(&mut reader, 8, &catalog)?;

    assert_eq!(report.internal_status.log_address, 0x24);
    assert_eq!(report.header.major_version, 1);
    assert_eq!(report.header.firmware_version, "FW12.345");
    assert_eq!(report.header.timestamp_millis, 0x0605_0403_0201);
    assert_eq!(report.header.statistic1.start_dword, 128);
    assert_eq!(report.header.statistic1.size_dword, 4);

    assert_eq!(report.statistics_area1.len(), 1);
    let stat = &report.statistics_area1[0];
    assert_eq!(stat.id, 0x2003);
    assert_eq!(stat.name, "Power-on Hours Count");
    assert_eq!(stat.data, StatData::Single(StatValue::Uint(12345)));

    assert!(report.statistics_area2.is_empty());
    assert!(report.event_fifo1.is_empty());
    assert!(report.diagnostics.is_empty());
    Ok(())
}

#[test]
fn test_all_four_regions_decode_in_order() -> Result<()> {
    let strings_blob = StringsLogBuilder::new().fifo_names("FIFO A", "FIFO B").build();
    let telemetry_blob = TelemetryLogBuilder::new()
        .statistics1(with_sentinel(stat_single(0x2003, 2, &1u32.to_le_bytes())))
        .statistics2(with_sentinel(stat_single(0x2004, 2, &2u32.to_le_bytes())))
        .events1(with_sentinel(event_desc(0x01, 0x0000, &7u64.to_le_bytes())))
        .events2(with_sentinel(event_desc(0x04, 0x0001, &[])))
        .build();

    let mut reader = MemLogReader::new()
        .insert(LOG_SAVED, strings_blob)
        .insert(LOG_CURRENT, telemetry_blob);

    let catalog = decode_strings(&mut reader, 8)?;
    let report = decode_telemetry(&mut reader, 16, &catalog)?;

    assert_eq!(report.statistics_area1[0].id, 0x2003);
    assert_eq!(report.statistics_area2[0].id, 0x2004);
    assert_eq!(report.event_fifo1[0].class_name, "Timestamp Class");
    assert_eq!(report.event_fifo2[0].name.as_deref(), Some("SATA - SRST"));
    Ok(())
}

#[test]
fn test_overlapping_statistic_areas() -> Result<()> {
    // area 2 shares its first bytes with area 1
    let payload = with_sentinel(stat_single(0x2003, 2, &5u32.to_le_bytes()));
    let telemetry_blob = TelemetryLogBuilder::new()
        .region_at(0, 128, payload.clone())
        .region_at(1, 128, payload)
        .build();

    let mut reader = MemLogReader::new().insert(LOG_CURRENT, telemetry_blob);
    let catalog = StringsCatalog::empty();
    let report = decode_telemetry(&mut reader, 8, &catalog)?;

    assert_eq!(report.statistics_area1.len(), 1);
    assert_eq!(report.statistics_area2.len(), 1);
    assert_eq!(report.statistics_area1[0].data, report.statistics_area2[0].data);
    Ok(())
}

#[test]
fn test_no_data() {
    let mut reader =
        MemLogReader::new().insert(LOG_CURRENT, internal_status_page(0x24, 0));
    let catalog = StringsCatalog::empty();
    match decode_telemetry(&mut reader, 8, &catalog) {
        Err(DecodeError::NoData { log_address }) => assert_eq!(log_address, LOG_CURRENT),
        other => panic!("expected NoData, got {:?}", other.err()),
    }
}

#[test]
fn test_truncated_budget() {
    let telemetry_blob = TelemetryLogBuilder::new()
        .statistics1(with_sentinel(stat_single(0x2003, 2, &1u32.to_le_bytes())))
        .build();
    let mut reader = MemLogReader::new().insert(LOG_CURRENT, telemetry_blob);
    let catalog = StringsCatalog::empty();

    // the header floor alone demands five pages
    match decode_telemetry(&mut reader, 4, &catalog) {
        Err(DecodeError::Truncated {
            log_address,
            budget,
            needed,
        }) => {
            assert_eq!(log_address, LOG_CURRENT);
            assert_eq!(budget, 4);
            assert_eq!(needed, 5);
        },
        other => panic!("expected Truncated, got {:?}", other.err()),
    }
}

#[test]
fn test_read_error_aborts_decode() {
    // header declares a statistics region, but the blob ends before it
    let mut blob = internal_status_page(0x24, 1);
    let mut header = vec![0u8; 512];
    header[110..118].copy_from_slice(&1024u64.to_le_bytes()); // S1 start
    header[118..126].copy_from_slice(&4u64.to_le_bytes()); // S1 size
    blob.extend_from_slice(&header);
    let mut reader = MemLogReader::new().insert(LOG_CURRENT, blob);
    let catalog = StringsCatalog::empty();

    match decode_telemetry(&mut reader, 64, &catalog) {
        Err(DecodeError::Read(read)) => {
            assert_eq!(read.log_address, LOG_CURRENT);
            assert_eq!(read.page_index, 9); // dword 1024 lives on page 9
        },
        other => panic!("expected ReadError, got {:?}", other.err()),
    }
}

#[test]
fn test_unknown_timestamp_protocol_is_soft() -> Result<()> {
    let telemetry_blob = TelemetryLogBuilder::new()
        .timestamp([0xff; 6], 0x0030)
        .statistics1(with_sentinel(stat_single(0x2003, 2, &1u32.to_le_bytes())))
        .build();
    let mut reader = MemLogReader::new().insert(LOG_CURRENT, telemetry_blob);
    let catalog = StringsCatalog::empty();

    let report = decode_telemetry(&mut reader, 8, &catalog)?;
    assert_eq!(report.header.timestamp_millis, 0);
    assert_eq!(report.diagnostics.len(), 1);
    assert!(report.diagnostics[0].contains("timestamp protocol"));
    assert_eq!(report.statistics_area1.len(), 1);
    Ok(())
}
