// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fs;

use anyhow::{Context, Result};
use ocp_telemetry_rs::{
    cfg::{
        cli::{CliOptions, resolve_config_path},
        config::Config,
        logger::init_logger,
    },
    decoder::{decode_strings, decode_telemetry},
    reader::{LOG_CURRENT, LOG_SAVED, file::FileLogReader},
    report::{JsonSink, PlainSink, ReportBridge, Sink},
};
use tracing::info;

fn main() -> Result<()> {
    let opts = CliOptions::parse(std::env::args().skip(1))?;
    let _logger_guard = init_logger(&opts.logger_config)?;

    let config = resolve_config_path(&opts.config)
        .and_then(Config::load_from_file)
        .context("failed to resolve or load config")?;

    let mut reader = FileLogReader::new()
        .attach(LOG_CURRENT, &config.input.current_log)?
        .attach(LOG_SAVED, &config.input.saved_log)?;

    let catalog = decode_strings(&mut reader, config.input.sector_budget_saved)?;
    info!(
        fifo1 = %catalog.header.event_fifo_1_name,
        fifo2 = %catalog.header.event_fifo_2_name,
        "strings catalog ready"
    );

    let report =
        decode_telemetry(&mut reader, config.input.sector_budget_current, &catalog)?;

    let mut sinks = vec![Sink::from(PlainSink::new())];
    if config.report.json_output.is_some() {
        sinks.push(Sink::from(JsonSink::new()));
    }

    let mut bridge = ReportBridge::new(&mut sinks);
    bridge.render_strings(&catalog);
    bridge.render_telemetry(&report, &catalog);

    for sink in sinks {
        match sink {
            Sink::PlainSink(plain) => print!("{}", plain.finish()),
            Sink::JsonSink(json) => {
                let path = config
                    .report
                    .json_output
                    .as_ref()
                    .expect("sink only built when a path is configured");
                fs::write(path, serde_json::to_string_pretty(&json.finish())?)
                    .with_context(|| format!("failed to write JSON report {path:?}"))?;
                info!(path = ?path, "JSON report written");
            },
        }
    }

    Ok(())
}
