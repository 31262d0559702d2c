// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use ocp_telemetry_rs::{
    decoder::statistics::decode_statistics,
    models::statistic::{DataType, StatData, StatType, StatValue},
    strings::StringsCatalog,
};

use crate::unit_tests::common::{stat_header, stat_single};

fn decode(buf: &[u8]) -> (Vec<ocp_telemetry_rs::models::statistic::Statistic>, Vec<String>) {
    let catalog = StringsCatalog::empty();
    let mut diagnostics = Vec::new();
    let stats = decode_statistics(buf, &catalog, &mut diagnostics);
    (stats, diagnostics)
}

#[test]
fn test_single_uint_statistic() {
    // Power-on Hours Count, one dword, little-endian 12345
    let mut buf = stat_single(0x2003, 2, &12345u32.to_le_bytes());
    buf.extend_from_slice(&[0u8; 8]); // zero sentinel

    let (stats, diagnostics) = decode(&buf);
    assert!(diagnostics.is_empty());
    assert_eq!(stats.len(), 1);
    let stat = &stats[0];
    assert_eq!(stat.id, 0x2003);
    assert_eq!(stat.name, "Power-on Hours Count");
    assert_eq!(stat.stat_type, StatType::Single);
    assert_eq!(stat.data_type, DataType::Uint);
    assert_eq!(stat.data_size_dwords, 1);
    assert_eq!(stat.data, StatData::Single(StatValue::Uint(12345)));
}

#[test]
fn test_single_int_widths() {
    // 8-byte signed value
    let mut buf = stat_single(0x2008, 1, &(-40i64).to_le_bytes());
    buf.extend_from_slice(&[0u8; 8]);
    let (stats, diagnostics) = decode(&buf);
    assert!(diagnostics.is_empty());
    assert_eq!(stats[0].data, StatData::Single(StatValue::Int(-40)));

    // a 12-byte integer has no defined width: value 0 plus a diagnostic
    let mut buf = stat_single(0x2008, 1, &[0xffu8; 12]);
    buf.extend_from_slice(&[0u8; 8]);
    let (stats, diagnostics) = decode(&buf);
    assert_eq!(stats[0].data, StatData::Single(StatValue::Int(0)));
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].contains("width"));
}

#[test]
fn test_single_ascii_statistic() {
    let mut buf = stat_single(0x2029, 4, b"REV A1  ");
    buf.extend_from_slice(&[0u8; 8]);
    let (stats, _) = decode(&buf);
    assert_eq!(
        stats[0].data,
        StatData::Single(StatValue::Ascii("REV A1".to_string()))
    );
}

#[test]
fn test_single_na_keeps_raw_bytes() {
    let mut buf = stat_single(0x9000, 0, &[0xde, 0xad, 0xbe, 0xef]);
    buf.extend_from_slice(&[0u8; 8]);
    let (stats, _) = decode(&buf);
    assert_eq!(stats[0].name, "Vendor Unique ID");
    assert_eq!(
        stats[0].data,
        StatData::Single(StatValue::Raw(vec![0xde, 0xad, 0xbe, 0xef]))
    );
}

#[test]
fn test_array_statistic() {
    // element_size byte 3 -> 4-byte elements, count byte 4 -> 5 elements
    let mut buf = stat_header(0x4003, 1, 1, 0, 0, 2, 6);
    buf.push(3);
    buf.push(0);
    buf.extend_from_slice(&4u16.to_le_bytes());
    for value in 1u32..=5 {
        buf.extend_from_slice(&value.to_le_bytes());
    }
    buf.extend_from_slice(&[0u8; 8]);

    let (stats, diagnostics) = decode(&buf);
    assert!(diagnostics.is_empty());
    let stat = &stats[0];
    assert_eq!(stat.name, "Erase Count");
    assert_eq!(stat.stat_type, StatType::Array);
    assert_eq!(
        stat.data,
        StatData::Array((1..=5).map(StatValue::Uint).collect())
    );
}

#[test]
fn test_array_extent_must_match_declared_size() {
    // 5 x 4 bytes = 20 bytes of elements, but the descriptor declares 7
    // dwords: (7 * 4) - 4 = 24 != 20, so the record is skipped
    let mut buf = stat_header(0x4003, 1, 1, 0, 0, 2, 7);
    buf.push(3);
    buf.push(0);
    buf.extend_from_slice(&4u16.to_le_bytes());
    for value in 1u32..=6 {
        buf.extend_from_slice(&value.to_le_bytes());
    }
    // trailing valid statistic proves the walk continues
    buf.extend_from_slice(&stat_single(0x2004, 2, &7u32.to_le_bytes()));
    buf.extend_from_slice(&[0u8; 8]);

    let (stats, diagnostics) = decode(&buf);
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].id, 0x2004);
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].contains("disagrees"));
}

#[test]
fn test_array_reserved_byte_diagnosed_but_decoded() {
    let mut buf = stat_header(0x4003, 1, 1, 0, 0, 2, 2);
    buf.push(0); // 1-byte elements
    buf.push(0x5a); // reserved byte must be zero
    buf.extend_from_slice(&3u16.to_le_bytes());
    buf.extend_from_slice(&[1, 2, 3, 4]);
    buf.extend_from_slice(&[0u8; 8]);

    let (stats, diagnostics) = decode(&buf);
    assert_eq!(stats.len(), 1);
    assert_eq!(
        stats[0].data,
        StatData::Array(vec![
            StatValue::Uint(1),
            StatValue::Uint(2),
            StatValue::Uint(3),
            StatValue::Uint(4)
        ])
    );
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].contains("reserved"));
}

#[test]
fn test_malformed_stat_type_skips_but_walk_continues() {
    let mut buf = stat_single(0x2003, 2, &1u32.to_le_bytes());
    // stat type 3 is reserved
    buf.extend_from_slice(&stat_header(0x2004, 3, 1, 0, 0, 2, 1));
    buf.extend_from_slice(&2u32.to_le_bytes());
    buf.extend_from_slice(&stat_single(0x2005, 2, &3u32.to_le_bytes()));
    buf.extend_from_slice(&[0u8; 8]);

    let (stats, diagnostics) = decode(&buf);
    assert_eq!(
        stats.iter().map(|s| s.id).collect::<Vec<_>>(),
        vec![0x2003, 0x2005]
    );
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].contains("statistics type not supported"));
}

#[test]
fn test_malformed_data_type_skips() {
    let mut buf = stat_header(0x2003, 0, 1, 0, 0, 5, 1);
    buf.extend_from_slice(&1u32.to_le_bytes());
    buf.extend_from_slice(&[0u8; 8]);

    let (stats, diagnostics) = decode(&buf);
    assert!(stats.is_empty());
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].contains("data type not supported"));
}

#[test]
fn test_walk_stops_at_zero_sentinel() {
    let mut buf = stat_single(0x2003, 2, &1u32.to_le_bytes());
    buf.extend_from_slice(&[0u8; 8]);
    // bytes after the sentinel must never be decoded
    buf.extend_from_slice(&stat_single(0x2004, 2, &2u32.to_le_bytes()));

    let (stats, diagnostics) = decode(&buf);
    assert_eq!(stats.len(), 1);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_descriptor_overrunning_region_stops_walk() {
    // header claims 16 dwords but only 4 bytes follow
    let mut buf = stat_header(0x2003, 0, 1, 0, 0, 2, 16);
    buf.extend_from_slice(&1u32.to_le_bytes());

    let (stats, diagnostics) = decode(&buf);
    assert!(stats.is_empty());
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].contains("walk stopped"));
}

#[test]
fn test_custom_hdd_spinup() {
    let mut body = Vec::new();
    body.extend_from_slice(&0x0222u16.to_le_bytes()); // max
    body.extend_from_slice(&0x0111u16.to_le_bytes()); // min
    for slot in [0x0123u16, 0x0150, 0, 0, 0, 0, 0, 0, 0, 0] {
        body.extend_from_slice(&slot.to_le_bytes());
    }
    let mut buf = stat_header(0x6006, 2, 1, 0, 0, 0, 6);
    buf.extend_from_slice(&body);
    buf.extend_from_slice(&[0u8; 8]);

    let (stats, diagnostics) = decode(&buf);
    assert!(diagnostics.is_empty());
    assert_eq!(stats[0].name, "Spinup Times");
    assert_eq!(
        stats[0].data,
        StatData::HddSpinup {
            spinup_max: 0x0222,
            spinup_min: 0x0111,
            spinup_hist: [0x0123, 0x0150, 0, 0, 0, 0, 0, 0, 0, 0],
        }
    );
}

#[test]
fn test_custom_scsi_log_page() {
    let mut buf = stat_header(0x0003, 2, 1, 0, 0, 0, 3);
    buf.push(0x19); // log page
    buf.push(0x01); // subpage
    buf.extend_from_slice(&[0, 0]);
    buf.extend_from_slice(&[0xaa; 8]);
    buf.extend_from_slice(&[0u8; 8]);

    let (stats, _) = decode(&buf);
    assert_eq!(stats[0].name, "SCSI Log Page");
    assert_eq!(
        stats[0].data,
        StatData::ScsiLogPage {
            log_page: 0x19,
            log_subpage: 0x01,
            data: vec![0xaa; 8],
        }
    );
}

#[test]
fn test_custom_ata_log_pages() {
    let mut body = Vec::new();
    body.push(0x30); // log address
    body.push(2); // two pages
    body.extend_from_slice(&5u16.to_le_bytes()); // initial page
    body.extend_from_slice(&[0x11; 512]);
    body.extend_from_slice(&[0x22; 512]);
    let mut buf = stat_header(0x0002, 2, 1, 0, 0, 0, (body.len() / 4) as u16);
    buf.extend_from_slice(&body);
    buf.extend_from_slice(&[0u8; 8]);

    let (stats, diagnostics) = decode(&buf);
    assert!(diagnostics.is_empty());
    match &stats[0].data {
        StatData::AtaLog {
            log_addr,
            log_page_count,
            initial_log_page,
            pages,
        } => {
            assert_eq!(*log_addr, 0x30);
            assert_eq!(*log_page_count, 2);
            assert_eq!(*initial_log_page, 5);
            assert_eq!(pages.len(), 2);
            assert!(pages[0].iter().all(|&b| b == 0x11));
            assert!(pages[1].iter().all(|&b| b == 0x22));
        },
        other => panic!("unexpected data: {other:?}"),
    }
}

#[test]
fn test_custom_unknown_id_uses_generic_value() {
    let mut buf = stat_header(0x9009, 2, 1, 0, 0, 2, 1);
    buf.extend_from_slice(&99u32.to_le_bytes());
    buf.extend_from_slice(&[0u8; 8]);

    let (stats, _) = decode(&buf);
    assert_eq!(stats[0].data, StatData::Custom(StatValue::Uint(99)));
}

#[test]
fn test_walk_consumes_declared_extents_exactly() {
    // two descriptors, then the sentinel: the walk must account for
    // header + size dwords per record
    let first = stat_single(0x2003, 2, &1u32.to_le_bytes());
    let second = stat_single(0x2004, 2, &2u64.to_le_bytes());
    let mut buf = Vec::new();
    buf.extend_from_slice(&first);
    buf.extend_from_slice(&second);
    buf.extend_from_slice(&[0u8; 8]);

    let (stats, _) = decode(&buf);
    let consumed: usize = stats
        .iter()
        .map(|s| 8 + s.data_size_dwords as usize * 4)
        .sum();
    assert_eq!(consumed, first.len() + second.len());
    assert_eq!(stats.len(), 2);
}
