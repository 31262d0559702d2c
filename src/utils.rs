// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fmt::Write;

/// Length of the OCP telemetry layout GUID.
pub const GUID_LEN: usize = 16;

/// Render a 16-byte OCP GUID in the specification's textual form:
/// 32 hex digits in reversed byte order, suffixed with `h`.
pub fn guid_to_str(guid: &[u8; GUID_LEN]) -> String {
    let mut out = String::with_capacity(GUID_LEN * 2 + 1);
    for byte in guid.iter().rev() {
        write!(&mut out, "{byte:02X}").expect("Writing to String cannot fail");
    }
    out.push('h');
    out
}

/// Convert a space-padded ASCII field to an owned string.
///
/// The copy stops at the first NUL byte; trailing spaces are dropped.
pub fn trim_ascii_field(data: &[u8]) -> String {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    let trimmed = &data[..end];
    let end = trimmed
        .iter()
        .rposition(|&b| b != b' ')
        .map_or(0, |p| p + 1);
    String::from_utf8_lossy(&trimmed[..end]).into_owned()
}

/// Convert an ATA identification string to an owned string.
///
/// ATA stores these fields word-wise with the bytes of each 16-bit word
/// swapped; undo the swap, then trim as [`trim_ascii_field`] does.
pub fn ata_id_string(data: &[u8]) -> String {
    let mut swapped = Vec::with_capacity(data.len());
    for pair in data.chunks(2) {
        if pair.len() == 2 {
            swapped.push(pair[1]);
            swapped.push(pair[0]);
        } else {
            swapped.push(pair[0]);
        }
    }
    trim_ascii_field(&swapped)
}

/// Render bytes as a single-line hex dump: `0xab 0xcd ...`.
pub fn hex_line(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 5);
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write!(&mut out, "0x{byte:02x}").expect("Writing to String cannot fail");
    }
    out
}

/// Render bytes as classic 16-bytes-per-row hex rows with an offset
/// column and an ASCII gutter.
pub fn hex_rows(data: &[u8]) -> Vec<String> {
    let mut rows = Vec::with_capacity(data.len().div_ceil(16));
    for (row_idx, chunk) in data.chunks(16).enumerate() {
        let mut row = String::with_capacity(8 + 16 * 3 + 16);
        write!(&mut row, "{:07x}: ", row_idx * 16).expect("Writing to String cannot fail");
        for i in 0..16 {
            match chunk.get(i) {
                Some(byte) => {
                    write!(&mut row, "{byte:02x} ").expect("Writing to String cannot fail")
                },
                None => row.push_str("   "),
            }
        }
        for &byte in chunk {
            row.push(if (b' '..=b'~').contains(&byte) {
                byte as char
            } else {
                '.'
            });
        }
        rows.push(row);
    }
    rows
}
