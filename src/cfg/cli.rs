// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Command-line options of the telemetry decoder.
#[derive(Debug)]
pub struct CliOptions {
    pub config: String,
    pub logger_config: String,
}

impl Default for CliOptions {
    fn default() -> Self {
        CliOptions {
            config: "config.yaml".to_string(),
            logger_config: "config_logger.yaml".to_string(),
        }
    }
}

impl CliOptions {
    /// Parse `--config <path>` / `--logger <path>` style arguments.
    pub fn parse<I: Iterator<Item = String>>(mut args: I) -> Result<Self> {
        let mut opts = CliOptions::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    opts.config = args.next().context("--config needs a path")?;
                },
                "--logger" => {
                    opts.logger_config = args.next().context("--logger needs a path")?;
                },
                other => bail!("unknown argument: {other}"),
            }
        }
        Ok(opts)
    }
}

pub fn resolve_config_path(rel: &str) -> Result<PathBuf> {
    let p = Path::new(rel);

    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .context("cannot get current working dir")?
            .join(p)
    };

    let canon = abs
        .canonicalize()
        .with_context(|| format!("failed to canonicalize path {abs:?}"))?;

    Ok(canon)
}
