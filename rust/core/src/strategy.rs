// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ingestion strategy selection.
//!
//! A pure decision on the document's byte size, made before any content is
//! touched. Oversized documents cost O(1) regardless of their actual size,
//! and large-but-acceptable documents never reach the structural parser.

use crate::config::PipelineConfig;

/// How a document will be ingested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Document exceeds the hard ceiling; nothing is read.
    Reject,
    /// Small enough for a full structural parse (may still fall back).
    FullParse,
    /// Too large to parse structurally; line scan only.
    SmartScan,
}

/// Select the ingestion strategy for a document of `byte_size` bytes.
pub fn select(byte_size: u64, config: &PipelineConfig) -> Strategy {
    if byte_size > config.reject_above_bytes {
        Strategy::Reject
    } else if byte_size <= config.full_parse_below_bytes {
        Strategy::FullParse
    } else {
        Strategy::SmartScan
    }
}
