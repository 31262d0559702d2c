//! Name resolution: built-in identifier tables and the strings catalog
//! built from the Saved Device Internal Status log.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Compiled-in identifier name tables.
pub mod builtin;
/// The strings catalog built from log 0x25.
pub mod catalog;

pub use catalog::StringsCatalog;
