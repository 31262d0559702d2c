// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::collections::HashMap;

use tracing::{debug, warn};
use zerocopy::FromBytes;

use crate::{
    decoder::{DecodeError, validate},
    models::{
        data_header::Region,
        event::class,
        internal_status::{InternalStatus, parse_internal_status},
        strings_header::{
            EventIdStringEntryRaw, STRING_ENTRY_LEN, STRINGS_HEADER_LEN,
            StatisticIdStringEntryRaw, TelemetryStringsHeader, event_key,
            parse_strings_header,
        },
    },
    reader::{LOG_SAVED, PAGE_SIZE, PageReader},
    strings::builtin::{builtin_event_name, builtin_statistic_name},
};

/// A slice of the ASCII table: `offset..offset + len`.
#[derive(Debug, Clone, Copy)]
struct AsciiSpan {
    offset: u64,
    len: u8,
}

/// Identifier-to-name mapping built from log 0x25. The catalog retains
/// the ASCII table for its own lifetime; lookups slice into it.
pub struct StringsCatalog {
    pub internal_status: InternalStatus,
    pub header: TelemetryStringsHeader,
    stat_names: HashMap<u16, AsciiSpan>,
    event_names: HashMap<u32, AsciiSpan>,
    ascii: Vec<u8>,
    pub diagnostics: Vec<String>,
}

impl StringsCatalog {
    /// Build the catalog from the Saved Device Internal Status log.
    ///
    /// The four string tables follow the 432-byte header with no gaps in
    /// the order (statistics-id, event, vu-event, ascii); the walk relies
    /// on that to cross page boundaries.
    pub fn read<R: PageReader>(
        reader: &mut R,
        sector_budget: u32,
    ) -> Result<Self, DecodeError> {
        let page0 = reader.read_page(LOG_SAVED, 0)?;
        let internal_status =
            InternalStatus::from(parse_internal_status(&page0).map_err(|e| {
                DecodeError::MalformedHeader {
                    log_address: LOG_SAVED,
                    reason: e.to_string(),
                }
            })?);
        if internal_status.area1_last_log_page == 0 {
            return Err(DecodeError::NoData {
                log_address: LOG_SAVED,
            });
        }

        // The strings header occupies the first 432 bytes of page 1; the
        // statistics-id string table starts immediately after it.
        let page1 = reader.read_page(LOG_SAVED, 1)?;
        let header = TelemetryStringsHeader::from(parse_strings_header(&page1).map_err(
            |e| DecodeError::MalformedHeader {
                log_address: LOG_SAVED,
                reason: e.to_string(),
            },
        )?);

        validate::check_strings_budget(&header, sector_budget)?;

        let tables = [
            header.statistics_id_table,
            header.event_table,
            header.vu_event_table,
            header.ascii_table,
        ];
        let mut buffers: [Vec<u8>; 4] =
            tables.map(|t| Vec::with_capacity(t.size_dword as usize * 4));
        let mut diagnostics = Vec::new();

        let mut remaining: u64 = tables.iter().map(|t| t.size_dword).sum();
        let mut dword_pos = (STRINGS_HEADER_LEN / 4) as u64;
        let mut page = page1;
        let mut page_offset = STRINGS_HEADER_LEN;
        let mut page_index: u16 = 1;

        while remaining > 0 {
            if page_offset == PAGE_SIZE {
                page_index += 1;
                page = reader.read_page(LOG_SAVED, page_index)?;
                page_offset = 0;
            }
            let dwords_in_page = ((PAGE_SIZE - page_offset) / 4) as u64;

            let Some(table_idx) = tables
                .iter()
                .position(|t| !t.is_empty() && t.start_dword <= dword_pos && dword_pos < t.end_dword())
            else {
                let diag =
                    "string tables ran out of space before all dwords were read".to_string();
                warn!("{diag}");
                diagnostics.push(diag);
                break;
            };

            let chunk = dwords_in_page
                .min(tables[table_idx].end_dword() - dword_pos)
                .min(remaining);
            let bytes = chunk as usize * 4;
            buffers[table_idx].extend_from_slice(&page[page_offset..page_offset + bytes]);

            dword_pos += chunk;
            page_offset += bytes;
            remaining -= chunk;
        }

        let [stat_buf, event_buf, vu_event_buf, ascii] = buffers;

        let mut stat_names = HashMap::new();
        if stat_buf.len() % STRING_ENTRY_LEN != 0 {
            diagnostics.push(format!(
                "statistics-id string table size {} is not a whole number of entries",
                stat_buf.len()
            ));
        }
        for raw in stat_buf.chunks_exact(STRING_ENTRY_LEN) {
            let entry = StatisticIdStringEntryRaw::ref_from_bytes(raw)
                .expect("chunk length matches entry size");
            stat_names.insert(
                entry.vu_statistic_id.get(),
                AsciiSpan {
                    offset: entry.ascii_id_offset.get(),
                    len: entry.ascii_id_len,
                },
            );
        }

        // event and VU-event entries live in one flat map
        let mut event_names = HashMap::new();
        for buf in [&event_buf, &vu_event_buf] {
            if buf.len() % STRING_ENTRY_LEN != 0 {
                diagnostics.push(format!(
                    "event string table size {} is not a whole number of entries",
                    buf.len()
                ));
            }
            for raw in buf.chunks_exact(STRING_ENTRY_LEN) {
                let entry = EventIdStringEntryRaw::ref_from_bytes(raw)
                    .expect("chunk length matches entry size");
                event_names.insert(
                    event_key(entry.dbg_class, entry.event_id.get()),
                    AsciiSpan {
                        offset: entry.ascii_id_offset.get(),
                        len: entry.ascii_id_len,
                    },
                );
            }
        }

        debug!(
            stat_entries = stat_names.len(),
            event_entries = event_names.len(),
            ascii_bytes = ascii.len(),
            "strings catalog built"
        );

        Ok(StringsCatalog {
            internal_status,
            header,
            stat_names,
            event_names,
            ascii,
            diagnostics,
        })
    }

    /// An empty catalog; every lookup falls back to the built-in tables.
    pub fn empty() -> Self {
        StringsCatalog {
            internal_status: InternalStatus {
                log_address: LOG_SAVED,
                organization_id: 0,
                area1_last_log_page: 0,
                area2_last_log_page: 0,
                area3_last_log_page: 0,
                saved_data_available: false,
                saved_data_generation_number: 0,
                reason_id: crate::models::internal_status::ReasonId {
                    valid_flags: Default::default(),
                    error_id: [0; 64],
                    file_id: [0; 8],
                    line_number: 0,
                    vu_reason_extension: [0; 32],
                },
            },
            header: TelemetryStringsHeader {
                log_page_version: 0,
                guid: crate::utils::guid_to_str(&[0; 16]),
                statistics_id_table: Region::default(),
                event_table: Region::default(),
                vu_event_table: Region::default(),
                ascii_table: Region::default(),
                event_fifo_1_name: String::new(),
                event_fifo_2_name: String::new(),
            },
            stat_names: HashMap::new(),
            event_names: HashMap::new(),
            ascii: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn ascii_str(&self, span: AsciiSpan) -> Option<String> {
        let start = usize::try_from(span.offset).ok()?;
        let end = start.checked_add(span.len as usize)?;
        if end > self.ascii.len() {
            warn!(
                offset = span.offset,
                len = span.len,
                "string entry points outside the ASCII table"
            );
            return None;
        }
        let bytes = &self.ascii[start..end];
        let cut = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Some(String::from_utf8_lossy(&bytes[..cut]).into_owned())
    }

    /// Resolve a statistic id to a name. The built-in table wins; the
    /// device's own strings apply to vendor-unique ids only.
    pub fn statistic_name(&self, id: u16) -> String {
        if let Some(name) = builtin_statistic_name(id) {
            return name.to_string();
        }
        if id >= 0x8000 {
            if let Some(name) = self.stat_names.get(&id).and_then(|&s| self.ascii_str(s)) {
                return name;
            }
            "Vendor Unique ID".to_string()
        } else {
            "Reserved ID".to_string()
        }
    }

    /// Resolve an event name. Statistic-snapshot events never resolve to
    /// a name of their own.
    pub fn event_name(&self, dbg_class: u8, event_id: u16) -> Option<String> {
        if dbg_class == class::STATISTIC_SNAP {
            return None;
        }
        if let Some(name) = builtin_event_name(dbg_class, event_id) {
            return Some(name.to_string());
        }
        if let Some(name) = self
            .event_names
            .get(&event_key(dbg_class, event_id))
            .and_then(|&s| self.ascii_str(s))
        {
            return Some(name);
        }
        Some(
            if event_id >= 0x8000 {
                "Vendor Unique ID"
            } else {
                "Reserved ID"
            }
            .to_string(),
        )
    }
}
