// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{
    collections::HashMap,
    fs::File,
    io::{self, Read, Seek, SeekFrom},
    path::Path,
};

use anyhow::{Context, Result};

use crate::reader::{PAGE_SIZE, PageReader, ReadPageError};

/// Page reader over raw log dumps, one file per log address. Each file
/// is the concatenation of the log's 512-byte pages starting at page 0.
pub struct FileLogReader {
    files: HashMap<u8, File>,
}

impl FileLogReader {
    pub fn new() -> Self {
        FileLogReader {
            files: HashMap::new(),
        }
    }

    /// Attach a dump file for one log address.
    pub fn attach<P: AsRef<Path>>(mut self, log_address: u8, path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).with_context(|| {
            format!(
                "failed to open dump for log {log_address:#04x}: {:?}",
                path.as_ref()
            )
        })?;
        self.files.insert(log_address, file);
        Ok(self)
    }
}

impl Default for FileLogReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PageReader for FileLogReader {
    fn read_page(
        &mut self,
        log_address: u8,
        page_index: u16,
    ) -> Result<[u8; PAGE_SIZE], ReadPageError> {
        let wrap = |source: io::Error| ReadPageError {
            log_address,
            page_index,
            source,
        };

        let file = self.files.get_mut(&log_address).ok_or_else(|| {
            wrap(io::Error::new(
                io::ErrorKind::NotFound,
                "no dump attached for this log address",
            ))
        })?;

        file.seek(SeekFrom::Start(page_index as u64 * PAGE_SIZE as u64))
            .map_err(wrap)?;
        let mut page = [0u8; PAGE_SIZE];
        file.read_exact(&mut page).map_err(wrap)?;
        Ok(page)
    }
}
