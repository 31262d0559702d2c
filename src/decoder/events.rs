// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tracing::warn;

use crate::{
    decoder::statistics,
    models::{
        event::{
            class, EVENT_HEADER_LEN, Event, EventBody, EventHeaderRaw, FIS_LEN, VuTail,
            class_name,
        },
        statistic::{STAT_HEADER_LEN, StatisticHeaderRaw},
    },
    strings::StringsCatalog,
};

const MEDIA_WEAR_BODY_LEN: usize = 12;
const VIRTUAL_FIFO_BODY_LEN: usize = 4;
const TIMESTAMP_BODY_LEN: usize = 8;

/// Walk an event FIFO snapshot. Class 0 is the end-of-FIFO sentinel; a
/// descriptor that claims more bytes than remain stops the walk with a
/// diagnostic.
pub fn decode_events(
    buf: &[u8],
    catalog: &StringsCatalog,
    diagnostics: &mut Vec<String>,
) -> Vec<Event> {
    let mut events = Vec::new();
    let mut pos = 0usize;

    while buf.len() - pos >= EVENT_HEADER_LEN {
        let header = EventHeaderRaw::parse(&buf[pos..])
            .expect("walk leaves at least a header's worth of bytes");
        let dbg_class = header.debug_event_class;
        if dbg_class == 0 {
            // end of FIFO
            break;
        }

        let record_len = if dbg_class == class::STATISTIC_SNAP {
            // the 8-bit data size cannot carry a snapshot; the real
            // length sits in the embedded statistic descriptor header
            if buf.len() - pos < EVENT_HEADER_LEN + STAT_HEADER_LEN {
                let diag = "statistic snapshot event truncated before its embedded \
                            descriptor header; walk stopped"
                    .to_string();
                warn!("{diag}");
                diagnostics.push(diag);
                break;
            }
            let stat_header = StatisticHeaderRaw::parse(&buf[pos + EVENT_HEADER_LEN..])
                .expect("bounds checked above");
            EVENT_HEADER_LEN
                + STAT_HEADER_LEN
                + stat_header.statistic_data_size.get() as usize * 4
        } else {
            EVENT_HEADER_LEN + header.data_size as usize * 4
        };

        if buf.len() - pos < record_len {
            let diag = format!(
                "event descriptor (class 0x{dbg_class:02x}) claims {record_len} bytes \
                 with {} left; walk stopped",
                buf.len() - pos
            );
            warn!("{diag}");
            diagnostics.push(diag);
            break;
        }

        let body = &buf[pos + EVENT_HEADER_LEN..pos + record_len];
        events.push(decode_one(header, body, catalog, diagnostics));
        pos += record_len;
    }

    events
}

fn decode_one(
    header: &EventHeaderRaw,
    body: &[u8],
    catalog: &StringsCatalog,
    diagnostics: &mut Vec<String>,
) -> Event {
    let dbg_class = header.debug_event_class;
    let id = header.event_id.get();
    let mut rest = body;

    let decoded = match dbg_class {
        class::TIMESTAMP => {
            if let Some((head, tail)) = split_body(rest, TIMESTAMP_BODY_LEN, dbg_class, diagnostics) {
                rest = tail;
                EventBody::Timestamp {
                    millis: u64::from_le_bytes(head.try_into().expect("8 bytes")),
                }
            } else {
                EventBody::None
            }
        },
        class::MEDIA_WEAR => {
            if let Some((head, tail)) =
                split_body(rest, MEDIA_WEAR_BODY_LEN, dbg_class, diagnostics)
            {
                rest = tail;
                let le32 = |at: usize| {
                    u32::from_le_bytes(head[at..at + 4].try_into().expect("4 bytes"))
                };
                if id == 0 {
                    EventBody::MediaWear {
                        host_tb_written: le32(0),
                        media_tb_written: le32(4),
                        ssd_media_tb_erased: le32(8),
                    }
                } else {
                    // other ids reserve the same 12 bytes
                    EventBody::None
                }
            } else {
                EventBody::None
            }
        },
        class::STATISTIC_SNAP => {
            // the whole body is the embedded statistic descriptor
            let snapshot = StatisticHeaderRaw::parse(rest).ok().and_then(|stat_header| {
                statistics::decode_one(
                    stat_header,
                    &rest[STAT_HEADER_LEN..],
                    catalog,
                    diagnostics,
                )
            });
            rest = &[];
            EventBody::StatisticSnapshot(snapshot.map(Box::new))
        },
        class::VIRTUAL_FIFO => {
            if let Some((head, tail)) =
                split_body(rest, VIRTUAL_FIFO_BODY_LEN, dbg_class, diagnostics)
            {
                rest = tail;
                let marker = u16::from_le_bytes([head[0], head[1]]);
                EventBody::VirtualFifo {
                    data_area: ((marker >> 11) & 0x7) as u8,
                    number: marker & 0x7ff,
                    // virtual FIFO names are stored with the marker as
                    // the id in the VU event string table
                    name: catalog.event_name(dbg_class, marker),
                }
            } else {
                EventBody::None
            }
        },
        class::SATA_TRANSPORT => {
            if let Some((head, tail)) = split_body(rest, FIS_LEN, dbg_class, diagnostics) {
                rest = tail;
                EventBody::SataFis {
                    fis: head.try_into().expect("28 bytes"),
                }
            } else {
                EventBody::None
            }
        },
        _ => EventBody::None,
    };

    let vu = decode_vu_tail(dbg_class, rest, catalog);

    Event {
        dbg_class,
        class_name: class_name(dbg_class),
        id,
        name: catalog.event_name(dbg_class, id),
        body: decoded,
        vu,
    }
}

/// Split the class-specific portion off the body, or report it short.
fn split_body<'a>(
    body: &'a [u8],
    want: usize,
    dbg_class: u8,
    diagnostics: &mut Vec<String>,
) -> Option<(&'a [u8], &'a [u8])> {
    if body.len() < want {
        let diag = format!(
            "event body (class 0x{dbg_class:02x}) is {} bytes, class portion needs {want}",
            body.len()
        );
        warn!("{diag}");
        diagnostics.push(diag);
        return None;
    }
    Some(body.split_at(want))
}

/// Bytes left after the class-specific portion: a vendor-unique event id
/// plus raw data for standard classes, raw data alone for vendor-unique
/// classes.
fn decode_vu_tail(dbg_class: u8, rest: &[u8], catalog: &StringsCatalog) -> Option<VuTail> {
    if rest.is_empty() {
        return None;
    }
    if dbg_class < class::VENDOR_UNIQUE_BASE && rest.len() >= 2 {
        let vu_id = u16::from_le_bytes([rest[0], rest[1]]);
        Some(VuTail {
            id: Some(vu_id),
            name: catalog.event_name(dbg_class, vu_id),
            data: rest[2..].to_vec(),
        })
    } else {
        Some(VuTail {
            id: None,
            name: None,
            data: rest.to_vec(),
        })
    }
}
