use std::{fs, path::Path, path::PathBuf};

use anyhow::Result;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub input: Input,
    pub report: Report,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Input {
    /// Raw dump of GP log 0x24 (Current Device Internal Status).
    pub current_log: PathBuf,
    /// Raw dump of GP log 0x25 (Saved Device Internal Status).
    pub saved_log: PathBuf,
    /// Page cap for log 0x24, from the drive's TELEMETRY DATA BLOCKS
    /// value or an operator override.
    pub sector_budget_current: u32,
    /// Page cap for log 0x25.
    pub sector_budget_saved: u32,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Report {
    /// Where to write the structured document; omit to skip JSON output.
    pub json_output: Option<PathBuf>,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&s)?;
        Ok(cfg)
    }
}
