// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ingestion pipeline.
//!
//! Strategy selection, structural parse with scanner fallback,
//! classification and description synthesis for a single document.
//! One invocation, one document, no shared state: the configuration is
//! passed in by reference and nothing outlives the call.

use crate::classify::{classify, Classification};
use crate::config::PipelineConfig;
use crate::describe::describe;
use crate::error::Error;
use crate::parser::{parse_document, AggregatedStats, DrawingEntity};
use crate::scan::scan_excerpt;
use crate::strategy::{select, Strategy};
use std::path::Path;

/// A document handed to the pipeline: a filename plus its raw bytes.
/// Borrowed, immutable, and discarded when the invocation returns.
#[derive(Debug, Clone, Copy)]
pub struct SourceDocument<'a> {
    pub filename: &'a str,
    pub bytes: &'a [u8],
}

impl<'a> SourceDocument<'a> {
    pub fn new(filename: &'a str, bytes: &'a [u8]) -> Self {
        Self { filename, bytes }
    }

    /// Document size in bytes.
    pub fn byte_size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// What the ingestion produced. Exactly one variant per document.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ParseOutcome {
    /// Full structural parse succeeded.
    Structured {
        /// Enumerated entities in document order, possibly capped.
        entities: Vec<DrawingEntity>,
        /// True aggregate counts, never capped.
        stats: AggregatedStats,
        /// Set when the enumeration cap was reached.
        truncated: bool,
    },
    /// Degraded line-oriented reading (document too large, or the
    /// structural parse failed).
    RawExcerpt {
        /// Bounded excerpt lines, sentinel included when truncated.
        lines: Vec<String>,
        /// Set when the line cap was reached.
        truncated: bool,
    },
    /// Document exceeded the hard size ceiling; no content was read.
    Rejected {
        /// Offending size in bytes.
        size: u64,
        /// The configured ceiling.
        limit: u64,
    },
    /// The document could not be read at all (path-based ingestion only).
    Failed {
        /// Human-readable reason.
        reason: String,
    },
}

impl ParseOutcome {
    /// Whether a usable (even degraded) reading was produced.
    pub fn is_usable(&self) -> bool {
        matches!(
            self,
            ParseOutcome::Structured { .. } | ParseOutcome::RawExcerpt { .. }
        )
    }
}

/// Everything a single ingestion produced.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IngestReport {
    /// Structured or degraded reading of the document.
    pub outcome: ParseOutcome,
    /// Space classification; `None` for rejected/failed documents.
    pub classification: Option<Classification>,
    /// Rendered description; `None` for rejected/failed documents.
    pub description: Option<String>,
}

/// Text the classifier gets to look at, per outcome variant.
///
/// A structural parse exposes layer and type names; a raw excerpt exposes
/// its lines.
fn classification_corpus(outcome: &ParseOutcome) -> String {
    match outcome {
        ParseOutcome::Structured { stats, .. } => {
            let mut corpus = String::new();
            for (layer, _) in stats.layers_sorted() {
                corpus.push_str(layer);
                corpus.push('\n');
            }
            for (entity_type, _) in stats.types_sorted() {
                corpus.push_str(entity_type);
                corpus.push('\n');
            }
            corpus
        }
        ParseOutcome::RawExcerpt { lines, .. } => lines.join("\n"),
        ParseOutcome::Rejected { .. } | ParseOutcome::Failed { .. } => String::new(),
    }
}

/// Ingest an in-memory document.
///
/// Total: size rejection and structural failures are reported as outcome
/// variants, never as errors. The only fallible leg (unreadable source)
/// lives in [`ingest_path`].
pub fn ingest(doc: &SourceDocument<'_>, config: &PipelineConfig) -> IngestReport {
    let outcome = match select(doc.byte_size(), config) {
        Strategy::Reject => ParseOutcome::Rejected {
            size: doc.byte_size(),
            limit: config.reject_above_bytes,
        },
        Strategy::FullParse => match attempt_full_parse(doc.bytes, config) {
            Ok(outcome) => outcome,
            // Structural failure degrades to the scanner.
            Err(_) => excerpt_outcome(doc.bytes, config),
        },
        Strategy::SmartScan => excerpt_outcome(doc.bytes, config),
    };

    if !outcome.is_usable() {
        return IngestReport {
            outcome,
            classification: None,
            description: None,
        };
    }

    let corpus = classification_corpus(&outcome);
    let classification = classify(doc.filename, &corpus);
    let description = describe(doc.filename, &outcome, &classification);

    IngestReport {
        outcome,
        classification: Some(classification),
        description: Some(description),
    }
}

/// Ingest a document from disk. An unreadable path yields
/// [`ParseOutcome::Failed`]; everything else behaves like [`ingest`].
pub fn ingest_path(path: &Path, config: &PipelineConfig) -> IngestReport {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    // Size gate from metadata alone: a rejected document is never read.
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > config.reject_above_bytes => {
            return IngestReport {
                outcome: ParseOutcome::Rejected {
                    size: meta.len(),
                    limit: config.reject_above_bytes,
                },
                classification: None,
                description: None,
            }
        }
        Ok(_) => {}
        Err(err) => return failed_report(Error::Io(err)),
    }

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => return failed_report(Error::Io(err)),
    };

    ingest(&SourceDocument::new(&filename, &bytes), config)
}

fn failed_report(err: Error) -> IngestReport {
    IngestReport {
        outcome: ParseOutcome::Failed {
            reason: err.to_string(),
        },
        classification: None,
        description: None,
    }
}

fn attempt_full_parse(bytes: &[u8], config: &PipelineConfig) -> crate::error::Result<ParseOutcome> {
    // The structural path requires clean text; only the fallback scanner
    // decodes permissively.
    let content = std::str::from_utf8(bytes)
        .map_err(|_| Error::structural(0, "document is not valid UTF-8"))?;
    let summary = parse_document(content, config)?;
    Ok(ParseOutcome::Structured {
        entities: summary.entities,
        stats: summary.stats,
        truncated: summary.truncated,
    })
}

fn excerpt_outcome(bytes: &[u8], config: &PipelineConfig) -> ParseOutcome {
    let excerpt = scan_excerpt(bytes, config.max_scan_lines);
    ParseOutcome::RawExcerpt {
        lines: excerpt.lines,
        truncated: excerpt.truncated,
    }
}
