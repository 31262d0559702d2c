// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use ocp_telemetry_rs::{
    decoder::{DecodeError, decode_strings},
    reader::{LOG_SAVED, PAGE_SIZE, mem::MemLogReader},
};

use crate::unit_tests::common::{StringsLogBuilder, internal_status_page};

#[test]
fn test_empty_strings_log() -> Result<()> {
    let blob = StringsLogBuilder::new().fifo_names("FIFO A", "FIFO B").build();
    let mut reader = MemLogReader::new().insert(LOG_SAVED, blob);

    let catalog = decode_strings(&mut reader, 8)?;
    assert_eq!(catalog.header.log_page_version, 1);
    assert_eq!(catalog.header.event_fifo_1_name, "FIFO A");
    assert_eq!(catalog.header.event_fifo_2_name, "FIFO B");
    assert!(catalog.diagnostics.is_empty());

    // with no device strings, everything falls back to the built-ins
    assert_eq!(catalog.statistic_name(0x2003), "Power-on Hours Count");
    assert_eq!(catalog.statistic_name(0x8001), "Vendor Unique ID");
    assert_eq!(catalog.statistic_name(0x1234), "Reserved ID");
    Ok(())
}

#[test]
fn test_no_data_when_area1_empty() {
    let blob = internal_status_page(0x25, 0);
    let mut reader = MemLogReader::new().insert(LOG_SAVED, blob);
    match decode_strings(&mut reader, 8) {
        Err(DecodeError::NoData { log_address }) => assert_eq!(log_address, LOG_SAVED),
        other => panic!("expected NoData, got {:?}", other.err()),
    }
}

#[test]
fn test_vendor_unique_names_resolve_through_ascii_table() -> Result<()> {
    let blob = StringsLogBuilder::new()
        .stat_name(0x8042, "Custom Wear Metric")
        .event_name(0x90, 0x0001, "Custom Event")
        .vu_event_name(0x0b, 0x0431, "Host Write FIFO")
        .build();
    let mut reader = MemLogReader::new().insert(LOG_SAVED, blob);

    let catalog = decode_strings(&mut reader, 8)?;
    assert_eq!(catalog.statistic_name(0x8042), "Custom Wear Metric");
    assert_eq!(catalog.event_name(0x90, 0x0001).as_deref(), Some("Custom Event"));
    // virtual FIFO names are keyed by the FIFO marker
    assert_eq!(
        catalog.event_name(0x0b, 0x0431).as_deref(),
        Some("Host Write FIFO")
    );
    Ok(())
}

#[test]
fn test_builtin_names_win_over_catalog() -> Result<()> {
    // the catalog also carries 0x2003 under a different name, but the
    // id is below 0x8000 so the built-in table wins
    let blob = StringsLogBuilder::new()
        .stat_name(0x2003, "Imposter Name")
        .event_name(0x04, 0x0002, "Imposter Reset")
        .build();
    let mut reader = MemLogReader::new().insert(LOG_SAVED, blob);

    let catalog = decode_strings(&mut reader, 8)?;
    assert_eq!(catalog.statistic_name(0x2003), "Power-on Hours Count");
    assert_eq!(
        catalog.event_name(0x04, 0x0002).as_deref(),
        Some("SATA - COMRESET")
    );
    Ok(())
}

#[test]
fn test_event_name_fallbacks() -> Result<()> {
    let blob = StringsLogBuilder::new().build();
    let mut reader = MemLogReader::new().insert(LOG_SAVED, blob);
    let catalog = decode_strings(&mut reader, 8)?;

    assert_eq!(
        catalog.event_name(0x04, 0x9000).as_deref(),
        Some("Vendor Unique ID")
    );
    assert_eq!(
        catalog.event_name(0x04, 0x0100).as_deref(),
        Some("Reserved ID")
    );
    // statistic snapshots never resolve an event name
    assert_eq!(catalog.event_name(0x0a, 0x0000), None);
    Ok(())
}

#[test]
fn test_tables_crossing_page_boundary() -> Result<()> {
    // page 1 has room for 20 dwords of tables after the header; 16
    // statistic entries (64 dwords) force the walk onto pages 2 and 3
    let mut builder = StringsLogBuilder::new();
    for i in 0..16u16 {
        builder = builder.stat_name(0x8000 + i, &format!("Vendor Statistic {i:02}"));
    }
    let blob = builder.build();
    assert!(blob.len() > 2 * PAGE_SIZE);
    let mut reader = MemLogReader::new().insert(LOG_SAVED, blob);

    let catalog = decode_strings(&mut reader, 8)?;
    for i in 0..16u16 {
        assert_eq!(
            catalog.statistic_name(0x8000 + i),
            format!("Vendor Statistic {i:02}")
        );
    }
    assert!(catalog.diagnostics.is_empty());
    Ok(())
}

#[test]
fn test_truncated_when_budget_too_small() {
    let mut builder = StringsLogBuilder::new();
    for i in 0..32u16 {
        builder = builder.stat_name(0x8100 + i, &format!("Padding Statistic {i:02}"));
    }
    let blob = builder.build();
    let mut reader = MemLogReader::new().insert(LOG_SAVED, blob);

    match decode_strings(&mut reader, 1) {
        Err(DecodeError::Truncated {
            log_address,
            budget,
            needed,
        }) => {
            assert_eq!(log_address, LOG_SAVED);
            assert_eq!(budget, 1);
            assert!(needed > 1);
        },
        other => panic!("expected Truncated, got {:?}", other.err()),
    }
}

#[test]
fn test_read_error_carries_page_address() {
    // only page 0 present; the header read on page 1 must fail
    let blob = internal_status_page(0x25, 1);
    let mut reader = MemLogReader::new().insert(LOG_SAVED, blob);
    match decode_strings(&mut reader, 8) {
        Err(DecodeError::Read(read)) => {
            assert_eq!(read.log_address, LOG_SAVED);
            assert_eq!(read.page_index, 1);
        },
        other => panic!("expected ReadError, got {:?}", other.err()),
    }
}
