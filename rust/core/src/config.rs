// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline configuration.
//!
//! All resource bounds live here and are passed into the entry points by
//! value. There is no process-global state, so concurrent invocations with
//! different bounds (tests, per-tenant limits) are safe.

/// Resource bounds for a single ingestion.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Hard ceiling in bytes. Documents above it are rejected without
    /// reading any content.
    pub reject_above_bytes: u64,
    /// Documents at or below this size get a full structural parse;
    /// larger ones go straight to the line scanner.
    pub full_parse_below_bytes: u64,
    /// Maximum number of entities retained in the enumerated list.
    /// Aggregate counts keep accumulating past this cap.
    pub max_enumerated_entities: usize,
    /// Maximum number of excerpt lines collected by the fallback scanner.
    pub max_scan_lines: usize,
}

impl PipelineConfig {
    /// Default hard ceiling: 30 MiB.
    pub const DEFAULT_REJECT_ABOVE: u64 = 30 * 1024 * 1024;
    /// Default full-parse threshold: 5 MiB.
    pub const DEFAULT_FULL_PARSE_BELOW: u64 = 5 * 1024 * 1024;
    /// Default enumeration cap.
    pub const DEFAULT_MAX_ENTITIES: usize = 200;
    /// Default scan-line cap.
    pub const DEFAULT_MAX_SCAN_LINES: usize = 300;
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reject_above_bytes: Self::DEFAULT_REJECT_ABOVE,
            full_parse_below_bytes: Self::DEFAULT_FULL_PARSE_BELOW,
            max_enumerated_entities: Self::DEFAULT_MAX_ENTITIES,
            max_scan_lines: Self::DEFAULT_MAX_SCAN_LINES,
        }
    }
}
