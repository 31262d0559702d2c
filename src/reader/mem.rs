// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{collections::HashMap, io};

use crate::reader::{PAGE_SIZE, PageReader, ReadPageError};

/// Page reader over in-memory blobs, one byte vector per log address.
/// A blob whose length is not a page multiple exposes its tail as a
/// missing page, mirroring a short dump file.
#[derive(Default)]
pub struct MemLogReader {
    logs: HashMap<u8, Vec<u8>>,
}

impl MemLogReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, log_address: u8, blob: Vec<u8>) -> Self {
        self.logs.insert(log_address, blob);
        self
    }
}

impl PageReader for MemLogReader {
    fn read_page(
        &mut self,
        log_address: u8,
        page_index: u16,
    ) -> Result<[u8; PAGE_SIZE], ReadPageError> {
        let wrap = |kind: io::ErrorKind, msg: &str| ReadPageError {
            log_address,
            page_index,
            source: io::Error::new(kind, msg.to_string()),
        };

        let blob = self
            .logs
            .get(&log_address)
            .ok_or_else(|| wrap(io::ErrorKind::NotFound, "no blob for this log address"))?;

        let start = page_index as usize * PAGE_SIZE;
        let end = start + PAGE_SIZE;
        if blob.len() < end {
            return Err(wrap(
                io::ErrorKind::UnexpectedEof,
                "page beyond end of blob",
            ));
        }
        let mut page = [0u8; PAGE_SIZE];
        page.copy_from_slice(&blob[start..end]);
        Ok(page)
    }
}
