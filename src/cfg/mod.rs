//! Configuration, command-line handling, and logging.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Command-line parsing and path resolution.
pub mod cli;
/// Tool configuration file parsing.
pub mod config;
/// Logger initialization.
pub mod logger;
