//! The decode pipeline: validate the internal-status headers, fetch the
//! declared regions, and walk them into typed records.

// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use thiserror::Error;
use tracing::debug;

use crate::{
    models::{
        data_header::{TelemetryDataHeader, parse_data_header},
        event::Event,
        internal_status::{InternalStatus, parse_internal_status},
        statistic::Statistic,
    },
    reader::{LOG_CURRENT, PageReader, ReadPageError},
    strings::StringsCatalog,
};

/// Event FIFO walking.
pub mod events;
/// Region fetching over the page reader.
pub mod region;
/// Statistics region walking.
pub mod statistics;
/// Sector-budget validation of both logs.
pub mod validate;

/// Hard decode failures. Soft anomalies (malformed records, unknown
/// timestamp protocols) are carried as report diagnostics instead.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("log {log_address:#04x}: device reports no telemetry data (area 1 last log page is zero)")]
    NoData { log_address: u8 },

    #[error("log {log_address:#04x}: sector budget {budget} too small, need {needed} pages")]
    Truncated {
        log_address: u8,
        budget: u32,
        needed: u64,
    },

    #[error(transparent)]
    Read(#[from] ReadPageError),

    #[error("log {log_address:#04x}: {reason}")]
    MalformedHeader { log_address: u8, reason: String },
}

/// Everything decoded from log 0x24, in decode order. Regions always
/// report in the order S1, S2, E1, E2 regardless of on-wire layout.
pub struct TelemetryReport {
    pub internal_status: InternalStatus,
    pub header: TelemetryDataHeader,
    pub statistics_area1: Vec<Statistic>,
    pub statistics_area2: Vec<Statistic>,
    pub event_fifo1: Vec<Event>,
    pub event_fifo2: Vec<Event>,
    pub diagnostics: Vec<String>,
}

/// Build the strings catalog from the Saved Device Internal Status log
/// (0x25). Run this first; statistics and event decoding consult it.
pub fn decode_strings<R: PageReader>(
    reader: &mut R,
    sector_budget: u32,
) -> Result<StringsCatalog, DecodeError> {
    StringsCatalog::read(reader, sector_budget)
}

/// Decode the Current Device Internal Status log (0x24) into a
/// [`TelemetryReport`].
pub fn decode_telemetry<R: PageReader>(
    reader: &mut R,
    sector_budget: u32,
    catalog: &StringsCatalog,
) -> Result<TelemetryReport, DecodeError> {
    let page0 = reader.read_page(LOG_CURRENT, 0)?;
    let internal_status =
        InternalStatus::from(parse_internal_status(&page0).map_err(|e| {
            DecodeError::MalformedHeader {
                log_address: LOG_CURRENT,
                reason: e.to_string(),
            }
        })?);
    if internal_status.area1_last_log_page == 0 {
        return Err(DecodeError::NoData {
            log_address: LOG_CURRENT,
        });
    }

    // area 1 starts at log page 1 with the telemetry data header; all
    // region offsets are relative to byte 0 of that page
    let page1 = reader.read_page(LOG_CURRENT, 1)?;
    let raw_header =
        parse_data_header(&page1).map_err(|e| DecodeError::MalformedHeader {
            log_address: LOG_CURRENT,
            reason: e.to_string(),
        })?;
    let (header, timestamp_diag) = TelemetryDataHeader::decode(raw_header);

    let mut diagnostics = Vec::new();
    diagnostics.extend(timestamp_diag);

    validate::check_telemetry_budget(&header, sector_budget)?;

    let mut report = TelemetryReport {
        internal_status,
        header,
        statistics_area1: Vec::new(),
        statistics_area2: Vec::new(),
        event_fifo1: Vec::new(),
        event_fifo2: Vec::new(),
        diagnostics,
    };

    if !report.header.statistic1.is_empty() {
        let buf = region::fetch_region(reader, LOG_CURRENT, report.header.statistic1)?;
        report.statistics_area1 =
            statistics::decode_statistics(&buf, catalog, &mut report.diagnostics);
    }
    if !report.header.statistic2.is_empty() {
        let buf = region::fetch_region(reader, LOG_CURRENT, report.header.statistic2)?;
        report.statistics_area2 =
            statistics::decode_statistics(&buf, catalog, &mut report.diagnostics);
    }
    if !report.header.event_fifo1.is_empty() {
        let buf = region::fetch_region(reader, LOG_CURRENT, report.header.event_fifo1)?;
        report.event_fifo1 = events::decode_events(&buf, catalog, &mut report.diagnostics);
    }
    if !report.header.event_fifo2.is_empty() {
        let buf = region::fetch_region(reader, LOG_CURRENT, report.header.event_fifo2)?;
        report.event_fifo2 = events::decode_events(&buf, catalog, &mut report.diagnostics);
    }

    debug!(
        stats_area1 = report.statistics_area1.len(),
        stats_area2 = report.statistics_area2.len(),
        events_fifo1 = report.event_fifo1.len(),
        events_fifo2 = report.event_fifo2.len(),
        diagnostics = report.diagnostics.len(),
        "telemetry log decoded"
    );

    Ok(report)
}
