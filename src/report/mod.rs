//! Report emission: one traversal of the decoded structures feeding the
//! plain-text and JSON sinks simultaneously.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// The traversal over decoded structures.
pub mod bridge;
/// Report sinks and the value model.
pub mod sink;

pub use bridge::ReportBridge;
pub use sink::{JsonSink, PlainSink, ReportSink, Sink, Value};
