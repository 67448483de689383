// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use archimaestro_core::{Classification, ParseOutcome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full ingestion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    /// Cache key for this result (SHA256 of file content).
    pub cache_key: String,
    /// Uploaded filename.
    pub filename: String,
    /// What the ingestion produced.
    pub outcome: OutcomeSummary,
    /// Recognized space, if any.
    pub classification: Option<ClassificationSummary>,
    /// Rendered description; absent for rejected/failed documents.
    pub description: Option<String>,
    /// Processing statistics.
    pub stats: ProcessingStats,
}

/// One enumerated entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    pub entity_type: String,
    pub layer: String,
}

/// Serializable view of the pipeline outcome. BTreeMaps keep the JSON
/// key order stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeSummary {
    /// Full structural parse.
    Structured {
        /// True total entity count.
        entity_count: usize,
        /// Enumerated entities (capped).
        entities: Vec<EntityRecord>,
        /// Counts per entity type.
        by_type: BTreeMap<String, usize>,
        /// Counts per layer.
        by_layer: BTreeMap<String, usize>,
        /// Whether the enumerated list was capped.
        truncated: bool,
    },
    /// Degraded line-oriented reading.
    RawExcerpt {
        /// Excerpt lines (capped, sentinel included).
        lines: Vec<String>,
        /// Whether the line cap was reached.
        truncated: bool,
    },
    /// Document exceeded the hard size ceiling.
    Rejected { size: u64, limit: u64 },
    /// Document could not be read.
    Failed { reason: String },
}

impl From<&ParseOutcome> for OutcomeSummary {
    fn from(outcome: &ParseOutcome) -> Self {
        match outcome {
            ParseOutcome::Structured {
                entities,
                stats,
                truncated,
            } => OutcomeSummary::Structured {
                entity_count: stats.total(),
                entities: entities
                    .iter()
                    .map(|e| EntityRecord {
                        entity_type: e.entity_type.clone(),
                        layer: e.layer.clone(),
                    })
                    .collect(),
                by_type: stats
                    .by_type
                    .iter()
                    .map(|(k, v)| (k.clone(), *v))
                    .collect(),
                by_layer: stats
                    .by_layer
                    .iter()
                    .map(|(k, v)| (k.clone(), *v))
                    .collect(),
                truncated: *truncated,
            },
            ParseOutcome::RawExcerpt { lines, truncated } => OutcomeSummary::RawExcerpt {
                lines: lines.clone(),
                truncated: *truncated,
            },
            ParseOutcome::Rejected { size, limit } => OutcomeSummary::Rejected {
                size: *size,
                limit: *limit,
            },
            ParseOutcome::Failed { reason } => OutcomeSummary::Failed {
                reason: reason.clone(),
            },
        }
    }
}

/// Serializable view of a classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationSummary {
    /// Recognized space label.
    pub label: String,
    /// Keywords that triggered the match.
    pub evidence: Vec<String>,
}

impl ClassificationSummary {
    /// Summarize a recognized classification; `None` when no rule matched.
    pub fn from_classification(classification: &Classification) -> Option<Self> {
        classification.label.map(|label| Self {
            label: label.to_string(),
            evidence: classification.evidence.to_vec(),
        })
    }
}

/// Processing statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Upload size in bytes.
    pub file_size: usize,
    /// Wall-clock ingestion time (ms).
    pub ingest_time_ms: u64,
    /// Whether result was from cache.
    pub from_cache: bool,
}
