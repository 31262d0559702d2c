// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tracing::warn;
use zerocopy::FromBytes;

use crate::{
    models::statistic::{
        ARRAY_HEADER_LEN, ArrayHeaderRaw, DataType, STAT_HEADER_LEN, StatData, StatType,
        StatValue, Statistic, StatisticHeaderRaw,
    },
    reader::PAGE_SIZE,
    strings::StringsCatalog,
    utils::trim_ascii_field,
};

/// Walk a statistics region. The list ends at a zero statistic id or
/// when the buffer is exhausted; a descriptor that claims more bytes
/// than remain stops the walk with a diagnostic.
pub fn decode_statistics(
    buf: &[u8],
    catalog: &StringsCatalog,
    diagnostics: &mut Vec<String>,
) -> Vec<Statistic> {
    let mut stats = Vec::new();
    let mut pos = 0usize;

    while buf.len() - pos >= STAT_HEADER_LEN {
        let header = StatisticHeaderRaw::parse(&buf[pos..])
            .expect("walk leaves at least a header's worth of bytes");
        let id = header.statistics_id.get();
        if id == 0 {
            // end-of-list sentinel
            break;
        }

        let record_len = STAT_HEADER_LEN + header.statistic_data_size.get() as usize * 4;
        if buf.len() - pos < record_len {
            let diag = format!(
                "statistic descriptor 0x{id:04x} claims {record_len} bytes with {} left; walk stopped",
                buf.len() - pos
            );
            warn!("{diag}");
            diagnostics.push(diag);
            break;
        }

        let body = &buf[pos + STAT_HEADER_LEN..pos + record_len];
        if let Some(stat) = decode_one(header, body, catalog, diagnostics) {
            stats.push(stat);
        }
        pos += record_len;
    }

    stats
}

/// Decode a single statistic descriptor whose body has already been
/// bounds-checked. Returns `None` (with a diagnostic) for descriptors
/// that must be skipped.
pub(crate) fn decode_one(
    header: &StatisticHeaderRaw,
    body: &[u8],
    catalog: &StringsCatalog,
    diagnostics: &mut Vec<String>,
) -> Option<Statistic> {
    let id = header.statistics_id.get();
    let info = header.statistics_info;

    let stat_type = match StatType::from_info(info[0]) {
        Ok(stat_type) => stat_type,
        Err(e) => {
            skip(diagnostics, id, &format!("statistics type not supported ({e})"));
            return None;
        },
    };
    let data_type = match DataType::from_info(info[2]) {
        Ok(data_type) => data_type,
        Err(e) => {
            skip(diagnostics, id, &format!("data type not supported ({e})"));
            return None;
        },
    };

    let data = match stat_type {
        StatType::Single => StatData::Single(decode_value(data_type, body, diagnostics)),
        StatType::Array => decode_array(id, data_type, body, diagnostics)?,
        StatType::Custom => decode_custom(id, data_type, body, diagnostics)?,
    };

    Some(Statistic {
        id,
        name: catalog.statistic_name(id),
        stat_type,
        behavior: info[0] & 0xf,
        unit: info[1],
        host_hint: (info[2] >> 4) & 0x3,
        data_type,
        data_size_dwords: header.statistic_data_size.get(),
        data,
    })
}

fn decode_array(
    id: u16,
    data_type: DataType,
    body: &[u8],
    diagnostics: &mut Vec<String>,
) -> Option<StatData> {
    let Ok((array_header, elements)) = ArrayHeaderRaw::ref_from_prefix(body) else {
        skip(
            diagnostics,
            id,
            &format!("array body too short for its {ARRAY_HEADER_LEN}-byte prelude"),
        );
        return None;
    };

    if array_header.reserved != 0 {
        let diag = format!(
            "array statistic 0x{id:04x}: reserved prelude byte is 0x{:02x}",
            array_header.reserved
        );
        warn!("{diag}");
        diagnostics.push(diag);
    }

    // both fields are stored off-by-one
    let width = array_header.element_size as usize + 1;
    let count = array_header.number_of_elements.get() as usize + 1;
    if width * count != elements.len() {
        skip(
            diagnostics,
            id,
            &format!(
                "array of {count} x {width} bytes disagrees with a {}-byte body",
                elements.len()
            ),
        );
        return None;
    }

    let values = elements
        .chunks_exact(width)
        .map(|element| decode_value(data_type, element, diagnostics))
        .collect();
    Some(StatData::Array(values))
}

fn decode_custom(
    id: u16,
    data_type: DataType,
    body: &[u8],
    diagnostics: &mut Vec<String>,
) -> Option<StatData> {
    match id {
        // ATA Log: captured raw log pages
        0x0002 => {
            if body.len() < 4 {
                skip(diagnostics, id, "ATA log body shorter than its fixed fields");
                return None;
            }
            let log_page_count = body[1];
            let pages_bytes = log_page_count as usize * PAGE_SIZE;
            if body.len() - 4 < pages_bytes {
                skip(
                    diagnostics,
                    id,
                    &format!(
                        "ATA log claims {log_page_count} pages but carries {} bytes",
                        body.len() - 4
                    ),
                );
                return None;
            }
            Some(StatData::AtaLog {
                log_addr: body[0],
                log_page_count,
                initial_log_page: u16::from_le_bytes([body[2], body[3]]),
                pages: body[4..4 + pages_bytes]
                    .chunks_exact(PAGE_SIZE)
                    .map(<[u8]>::to_vec)
                    .collect(),
            })
        },
        // SCSI Log Page: page, subpage, then the raw page data
        0x0003 => {
            if body.len() < 4 {
                skip(diagnostics, id, "SCSI log body shorter than its fixed fields");
                return None;
            }
            Some(StatData::ScsiLogPage {
                log_page: body[0],
                log_subpage: body[1],
                data: body[4..].to_vec(),
            })
        },
        // HDD Spinup Times: max, min, ten-slot history
        0x6006 => {
            if body.len() < 24 {
                skip(diagnostics, id, "spinup body shorter than its 24 bytes");
                return None;
            }
            let le16 = |at: usize| u16::from_le_bytes([body[at], body[at + 1]]);
            let mut spinup_hist = [0u16; 10];
            for (slot, value) in spinup_hist.iter_mut().enumerate() {
                *value = le16(4 + slot * 2);
            }
            Some(StatData::HddSpinup {
                spinup_max: le16(0),
                spinup_min: le16(2),
                spinup_hist,
            })
        },
        _ => Some(StatData::Custom(decode_value(data_type, body, diagnostics))),
    }
}

/// Decode one value per the declared data type. Integer widths outside
/// {1, 2, 4, 8} yield 0 with a diagnostic.
fn decode_value(data_type: DataType, bytes: &[u8], diagnostics: &mut Vec<String>) -> StatValue {
    match data_type {
        DataType::Int => StatValue::Int(match bytes.len() {
            1 => bytes[0] as i8 as i64,
            2 => i16::from_le_bytes([bytes[0], bytes[1]]) as i64,
            4 => i32::from_le_bytes(bytes.try_into().expect("4 bytes")) as i64,
            8 => i64::from_le_bytes(bytes.try_into().expect("8 bytes")),
            width => {
                unsupported_width(diagnostics, width);
                0
            },
        }),
        DataType::Uint => StatValue::Uint(match bytes.len() {
            1 => bytes[0] as u64,
            2 => u16::from_le_bytes([bytes[0], bytes[1]]) as u64,
            4 => u32::from_le_bytes(bytes.try_into().expect("4 bytes")) as u64,
            8 => u64::from_le_bytes(bytes.try_into().expect("8 bytes")),
            width => {
                unsupported_width(diagnostics, width);
                0
            },
        }),
        DataType::Ascii => StatValue::Ascii(trim_ascii_field(bytes)),
        DataType::Fp | DataType::Na => StatValue::Raw(bytes.to_vec()),
    }
}

fn unsupported_width(diagnostics: &mut Vec<String>, width: usize) {
    let diag = format!("unsupported integer width {width}; value reported as 0");
    warn!("{diag}");
    diagnostics.push(diag);
}

fn skip(diagnostics: &mut Vec<String>, id: u16, reason: &str) {
    let diag = format!("malformed statistic descriptor 0x{id:04x} skipped - {reason}");
    warn!("{diag}");
    diagnostics.push(diag);
}
