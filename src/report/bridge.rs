// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{
    decoder::TelemetryReport,
    models::{
        event::{Event, EventBody},
        internal_status::{InternalStatus, ReasonIdFlags},
        statistic::{
            StatData, StatValue, Statistic, behavior_name, host_hint_name, unit_name,
        },
    },
    report::sink::{ReportSink, Sink, Value},
    strings::StringsCatalog,
};

/// Walks the decoded structures once, pushing every field to all sinks.
/// Traversal order matches decode order; regions render as S1, S2, E1,
/// E2.
pub struct ReportBridge<'a> {
    sinks: &'a mut [Sink],
}

impl<'a> ReportBridge<'a> {
    pub fn new(sinks: &'a mut [Sink]) -> Self {
        ReportBridge { sinks }
    }

    fn section(&mut self, key: &str, title: &str) {
        for sink in self.sinks.iter_mut() {
            sink.section(key, title);
        }
    }

    fn list(&mut self, key: &str, title: Option<&str>) {
        for sink in self.sinks.iter_mut() {
            sink.list(key, title);
        }
    }

    fn item(&mut self, label: &str) {
        for sink in self.sinks.iter_mut() {
            sink.item(label);
        }
    }

    fn field(&mut self, key: &str, label: &str, value: Value) {
        for sink in self.sinks.iter_mut() {
            sink.field(key, label, &value);
        }
    }

    fn end(&mut self) {
        for sink in self.sinks.iter_mut() {
            sink.end();
        }
    }

    /// Render the strings-log half: internal status plus strings header.
    pub fn render_strings(&mut self, catalog: &StringsCatalog) {
        self.section("ocp_telemetry_strings", "");
        self.render_internal_status(&catalog.internal_status, false);
        self.render_strings_header(catalog);
        if !catalog.diagnostics.is_empty() {
            self.render_diagnostics(&catalog.diagnostics);
        }
        self.end();
    }

    /// Render the telemetry-log half: internal status, data header and
    /// every decoded region.
    pub fn render_telemetry(&mut self, report: &TelemetryReport, catalog: &StringsCatalog) {
        self.section("ocp_telemetry_data", "");
        self.render_internal_status(&report.internal_status, true);
        self.render_data_header(report);

        if !report.statistics_area1.is_empty() || !report.header.statistic1.is_empty() {
            self.render_statistics_area(
                "statistic_area_1",
                "OCP Statistics Area 1",
                &report.statistics_area1,
            );
        }
        if !report.statistics_area2.is_empty() || !report.header.statistic2.is_empty() {
            self.render_statistics_area(
                "statistic_area_2",
                "OCP Statistics Area 2",
                &report.statistics_area2,
            );
        }
        if !report.header.event_fifo1.is_empty() {
            self.render_event_fifo(
                "event_fifo_1",
                "OCP Event Fifo 1",
                &catalog.header.event_fifo_1_name,
                &report.event_fifo1,
            );
        }
        if !report.header.event_fifo2.is_empty() {
            self.render_event_fifo(
                "event_fifo_2",
                "OCP Event Fifo 2",
                &catalog.header.event_fifo_2_name,
                &report.event_fifo2,
            );
        }

        if !report.diagnostics.is_empty() {
            self.render_diagnostics(&report.diagnostics);
        }
        self.end();
    }

    fn render_diagnostics(&mut self, diagnostics: &[String]) {
        self.field(
            "diagnostics",
            "Diagnostics",
            Value::List(diagnostics.iter().map(|d| Value::Str(d.clone())).collect()),
        );
    }

    fn render_internal_status(&mut self, status: &InternalStatus, current: bool) {
        let (key, title) = if current {
            (
                "ata_current_device_internal_status",
                "Current Device Internal Status log (GP Log 0x24)",
            )
        } else {
            (
                "ata_saved_device_internal_status",
                "Saved Device Internal Status log (GP Log 0x25)",
            )
        };
        self.section(key, title);
        self.field(
            "organization_id",
            "Organization ID",
            Value::Hex {
                value: status.organization_id as u64,
                width: 8,
            },
        );
        self.field(
            "area1_last_log_page",
            "Area 1 Last Log Page",
            Value::Hex {
                value: status.area1_last_log_page as u64,
                width: 4,
            },
        );
        self.field(
            "area2_last_log_page",
            "Area 2 Last Log Page",
            Value::Hex {
                value: status.area2_last_log_page as u64,
                width: 4,
            },
        );
        self.field(
            "area3_last_log_page",
            "Area 3 Last Log Page",
            Value::Hex {
                value: status.area3_last_log_page as u64,
                width: 4,
            },
        );
        self.field(
            "saved_data_available",
            "Saved Data Available",
            Value::Bool(status.saved_data_available),
        );
        self.field(
            "saved_data_generation_number",
            "Saved Data Generation Number",
            Value::Hex {
                value: status.saved_data_generation_number as u64,
                width: 4,
            },
        );

        let reason = &status.reason_id;
        self.section("reason_id", "Reason ID:");
        self.field(
            "valid_flags",
            "Valid Flags",
            Value::Hex {
                value: reason.valid_flags.bits() as u64,
                width: 1,
            },
        );
        if reason.valid_flags.contains(ReasonIdFlags::ERROR_ID) {
            self.field(
                "error_id",
                "Error ID",
                Value::Bytes(reason.error_id.to_vec()),
            );
        }
        if reason.valid_flags.contains(ReasonIdFlags::FILE_ID) {
            self.field("file_id", "File ID", Value::Bytes(reason.file_id.to_vec()));
        }
        if reason.valid_flags.contains(ReasonIdFlags::LINE_NUMBER) {
            self.field(
                "line_number",
                "Line number",
                Value::Hex {
                    value: reason.line_number as u64,
                    width: 4,
                },
            );
        }
        if reason.valid_flags.contains(ReasonIdFlags::VU_EXT) {
            self.field(
                "vu_reason_extension",
                "VU Reason Extension",
                Value::Bytes(reason.vu_reason_extension.to_vec()),
            );
        }
        self.end();
        self.end();
    }

    fn render_strings_header(&mut self, catalog: &StringsCatalog) {
        let header = &catalog.header;
        self.section("ocp_telemetry_strings_header", "OCP Telemetry Strings Header");
        self.field(
            "log_page_version",
            "Log Page Version",
            Value::Hex {
                value: header.log_page_version as u64,
                width: 4,
            },
        );
        self.field("guid", "GUID", Value::Str(header.guid.clone()));
        for (key, title, region) in [
            (
                "statistics_id_string_table",
                "Statistics ID String Table:",
                header.statistics_id_table,
            ),
            ("event_string_table", "Event String Table:", header.event_table),
            (
                "vu_event_string_table",
                "VU Event String Table:",
                header.vu_event_table,
            ),
            ("ascii_table", "ASCII Table:", header.ascii_table),
        ] {
            self.section(key, title);
            self.field(
                "start",
                "Start",
                Value::Hex {
                    value: region.start_dword,
                    width: 4,
                },
            );
            self.field(
                "size",
                "Size",
                Value::Hex {
                    value: region.size_dword,
                    width: 4,
                },
            );
            self.end();
        }
        self.field(
            "event_fifo_1_name",
            "Event FIFO 1 Name",
            Value::Str(header.event_fifo_1_name.clone()),
        );
        self.field(
            "event_fifo_2_name",
            "Event FIFO 2 Name",
            Value::Str(header.event_fifo_2_name.clone()),
        );
        self.end();
    }

    fn render_data_header(&mut self, report: &TelemetryReport) {
        let header = &report.header;
        self.section("ocp_telemetry_data_header", "OCP Telemetry Data Header");
        self.field(
            "major_version",
            "Major Version",
            Value::Hex {
                value: header.major_version as u64,
                width: 4,
            },
        );
        self.field(
            "minor_version",
            "Minor Version",
            Value::Hex {
                value: header.minor_version as u64,
                width: 4,
            },
        );
        self.field(
            "timestamp",
            "Timestamp",
            Value::Hex {
                value: header.timestamp_millis,
                width: 4,
            },
        );
        self.field("guid", "GUID", Value::Str(header.guid.clone()));
        self.field(
            "device_string_data_size",
            "Device String Data Size",
            Value::Hex {
                value: header.device_string_data_size as u64,
                width: 4,
            },
        );
        self.field(
            "firmware_version",
            "Firmware version",
            Value::Str(header.firmware_version.clone()),
        );
        for (key, title, region) in [
            ("statistic_area_1", "Statistic Area 1:", header.statistic1),
            ("statistic_area_2", "Statistic Area 2:", header.statistic2),
            ("event_fifo_1", "Event FIFO 1:", header.event_fifo1),
            ("event_fifo_2", "Event FIFO 2:", header.event_fifo2),
        ] {
            self.section(key, title);
            self.field(
                "start",
                "Start",
                Value::Hex {
                    value: region.start_dword,
                    width: 4,
                },
            );
            self.field(
                "size",
                "Size",
                Value::Hex {
                    value: region.size_dword,
                    width: 4,
                },
            );
            self.end();
        }
        self.end();
    }

    fn render_statistics_area(&mut self, key: &str, title: &str, stats: &[Statistic]) {
        self.list(key, Some(title));
        for (idx, stat) in stats.iter().enumerate() {
            self.item(&format!("Statistic Descriptor {idx}"));
            self.render_statistic(stat);
            self.end();
        }
        self.end();
    }

    fn render_statistic(&mut self, stat: &Statistic) {
        self.field(
            "id",
            "Statistic ID",
            Value::Named {
                value: stat.id as u64,
                width: 4,
                name: stat.name.clone(),
            },
        );
        self.field(
            "statistic_type",
            "Statistic Type",
            Value::Named {
                value: stat.stat_type as u64,
                width: 1,
                name: stat.stat_type.name().to_string(),
            },
        );
        self.field(
            "behavior_type",
            "Behavior Type",
            Value::Named {
                value: stat.behavior as u64,
                width: 2,
                name: behavior_name(stat.behavior).to_string(),
            },
        );
        self.field(
            "unit",
            "Unit",
            Value::Named {
                value: stat.unit as u64,
                width: 2,
                name: unit_name(stat.unit).to_string(),
            },
        );
        self.field(
            "host_hint_type",
            "Host Hint Type",
            Value::Named {
                value: stat.host_hint as u64,
                width: 1,
                name: host_hint_name(stat.host_hint).to_string(),
            },
        );
        self.field(
            "data_type",
            "Data Type",
            Value::Named {
                value: stat.data_type as u64,
                width: 1,
                name: stat.data_type.name().to_string(),
            },
        );
        self.field(
            "data_size",
            "Statistic Data Size",
            Value::Hex {
                value: stat.data_size_dwords as u64,
                width: 1,
            },
        );
        self.render_stat_data(stat);
    }

    fn stat_value(value: &StatValue) -> Value {
        match value {
            StatValue::Int(v) => Value::Int(*v),
            StatValue::Uint(v) => Value::Uint(*v),
            StatValue::Ascii(s) => Value::Str(s.clone()),
            StatValue::Raw(bytes) => Value::Bytes(bytes.clone()),
        }
    }

    fn render_stat_data(&mut self, stat: &Statistic) {
        match &stat.data {
            StatData::Single(value) | StatData::Custom(value) => {
                self.field("data", "Data", Self::stat_value(value));
            },
            StatData::Array(values) => {
                self.field(
                    "data",
                    "Data",
                    Value::List(values.iter().map(Self::stat_value).collect()),
                );
            },
            StatData::AtaLog {
                log_addr,
                log_page_count,
                initial_log_page,
                pages,
            } => {
                self.section("data", "Data:");
                self.field(
                    "log_address",
                    "Log Address",
                    Value::Hex {
                        value: *log_addr as u64,
                        width: 1,
                    },
                );
                self.field(
                    "log_page_count",
                    "Log Page Count",
                    Value::Hex {
                        value: *log_page_count as u64,
                        width: 1,
                    },
                );
                self.field(
                    "initial_log_page",
                    "Initial Log Page",
                    Value::Hex {
                        value: *initial_log_page as u64,
                        width: 4,
                    },
                );
                self.list("log_page", None);
                for (idx, page) in pages.iter().enumerate() {
                    self.item(&format!(
                        "Log Page 0x{:04x}:",
                        *initial_log_page as usize + idx
                    ));
                    self.field("data", "Page Data", Value::Dump(page.clone()));
                    self.end();
                }
                self.end();
                self.end();
            },
            StatData::ScsiLogPage {
                log_page,
                log_subpage,
                data,
            } => {
                self.section("data", "Data:");
                self.field(
                    "log_page",
                    "Log Page",
                    Value::Hex {
                        value: *log_page as u64,
                        width: 4,
                    },
                );
                self.field(
                    "log_subpage",
                    "Log Subpage",
                    Value::Hex {
                        value: *log_subpage as u64,
                        width: 4,
                    },
                );
                self.field("log_page_data", "Log Page Data", Value::Dump(data.clone()));
                self.end();
            },
            StatData::HddSpinup {
                spinup_max,
                spinup_min,
                spinup_hist,
            } => {
                self.section("data", "Data:");
                // zero slots mean "absent"
                if *spinup_max != 0 {
                    self.field(
                        "lifetime_spinup_max",
                        "Lifetime Spinup Max",
                        Value::Hex {
                            value: *spinup_max as u64,
                            width: 4,
                        },
                    );
                }
                if *spinup_min != 0 {
                    self.field(
                        "lifetime_spinup_min",
                        "Lifetime Spinup Min",
                        Value::Hex {
                            value: *spinup_min as u64,
                            width: 4,
                        },
                    );
                }
                let history: Vec<u64> = spinup_hist
                    .iter()
                    .take_while(|&&slot| slot != 0)
                    .map(|&slot| slot as u64)
                    .collect();
                self.field(
                    "spinup_history",
                    "Spinup History",
                    Value::HexList {
                        values: history,
                        width: 4,
                    },
                );
                self.end();
            },
        }
    }

    fn render_event_fifo(&mut self, key: &str, title: &str, name: &str, events: &[Event]) {
        let full_title = if name.is_empty() {
            title.to_string()
        } else {
            format!("{title}: {name}")
        };
        self.section(key, &full_title);
        if !name.is_empty() {
            self.field("name", "Name", Value::Str(name.to_string()));
        }
        self.list("events", None);
        for (idx, event) in events.iter().enumerate() {
            self.item(&format!("Event Descriptor {idx}"));
            self.render_event(event);
            self.end();
        }
        self.end();
        self.end();
    }

    fn render_event(&mut self, event: &Event) {
        self.field(
            "class",
            "Class",
            Value::Named {
                value: event.dbg_class as u64,
                width: 2,
                name: event.class_name.clone(),
            },
        );
        if let Some(name) = &event.name {
            self.field(
                "id",
                "Id",
                Value::Named {
                    value: event.id as u64,
                    width: 4,
                    name: name.clone(),
                },
            );
        }

        match &event.body {
            EventBody::Timestamp { millis } => {
                self.field(
                    "timestamp",
                    "Timestamp",
                    Value::Hex {
                        value: *millis,
                        width: 4,
                    },
                );
            },
            EventBody::MediaWear {
                host_tb_written,
                media_tb_written,
                ssd_media_tb_erased,
            } => {
                self.field(
                    "host_tb_written",
                    "Host TB Written",
                    Value::Hex {
                        value: *host_tb_written as u64,
                        width: 4,
                    },
                );
                self.field(
                    "media_tb_written",
                    "Media TB Written",
                    Value::Hex {
                        value: *media_tb_written as u64,
                        width: 4,
                    },
                );
                self.field(
                    "ssd_media_tb_erased",
                    "SSD Media TB Erased",
                    Value::Hex {
                        value: *ssd_media_tb_erased as u64,
                        width: 4,
                    },
                );
            },
            EventBody::StatisticSnapshot(snapshot) => {
                self.section("statistic_descriptor", "Statistic Descriptor Snapshot:");
                if let Some(stat) = snapshot {
                    self.render_statistic(stat);
                }
                self.end();
            },
            EventBody::VirtualFifo {
                data_area,
                number,
                name,
            } => {
                self.field(
                    "data_area",
                    "Virtual FIFO Data Area",
                    Value::Hex {
                        value: *data_area as u64,
                        width: 4,
                    },
                );
                if let Some(name) = name {
                    self.field(
                        "virtual_fifo_number",
                        "Virtual FIFO Number",
                        Value::Hex {
                            value: *number as u64,
                            width: 4,
                        },
                    );
                    self.field(
                        "virtual_fifo_name",
                        "Virtual FIFO Name",
                        Value::Str(name.clone()),
                    );
                }
            },
            EventBody::SataFis { fis } => {
                self.field("fis", "FIS", Value::Bytes(fis.to_vec()));
            },
            EventBody::None => {},
        }

        if let Some(vu) = &event.vu {
            if let Some(vu_id) = vu.id {
                let name = vu.name.clone().unwrap_or_default();
                self.field(
                    "vu_event_id",
                    "VU Event ID",
                    Value::Named {
                        value: vu_id as u64,
                        width: 4,
                        name,
                    },
                );
            }
            if !vu.data.is_empty() {
                self.field("vu_data", "VU Data", Value::Bytes(vu.data.clone()));
            }
        }
    }
}
