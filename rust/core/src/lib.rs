// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Archimaestro Core
//!
//! Bounded DXF ingestion: parse a drawing interchange document into a
//! structured summary, guess the kind of space it depicts, and synthesize a
//! natural-language description for a downstream generative system.
//!
//! ## Overview
//!
//! - **Strategy selection**: size-gated choice between a full structural
//!   parse and a degraded line scan; oversized documents are rejected in
//!   O(1) before any content is read.
//! - **Structural parsing**: group-pair interpretation of the ENTITIES
//!   section with bounded enumeration and true aggregate counts.
//! - **Fallback scanning**: lossy, structure-agnostic line excerpt using
//!   [memchr](https://docs.rs/memchr) byte search; total over arbitrary
//!   input.
//! - **Classification**: ordered keyword rule table over filename plus
//!   extracted evidence.
//! - **Description synthesis**: deterministic four-branch template render.
//!
//! ## Quick Start
//!
//! ```rust
//! use archimaestro_core::{ingest, ParseOutcome, PipelineConfig, SourceDocument};
//!
//! let content = b"0\nSECTION\n2\nENTITIES\n0\nLINE\n8\nMURI\n0\nENDSEC\n0\nEOF\n";
//! let doc = SourceDocument::new("bagno.dxf", content);
//! let report = ingest(&doc, &PipelineConfig::default());
//!
//! match &report.outcome {
//!     ParseOutcome::Structured { stats, .. } => {
//!         println!("{} entities", stats.total());
//!     }
//!     ParseOutcome::RawExcerpt { lines, .. } => {
//!         println!("degraded reading, {} lines", lines.len());
//!     }
//!     _ => {}
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: enable serialization of outcomes for API layers

pub mod classify;
pub mod config;
pub mod describe;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod scan;
pub mod strategy;

pub use classify::{classify, classify_with_rules, Classification, SpaceRule, DEFAULT_RULES};
pub use config::PipelineConfig;
pub use describe::describe;
pub use error::{Error, Result};
pub use parser::{
    parse_document, AggregatedStats, DrawingEntity, GroupPair, GroupPairs, StructuredSummary,
    UNKNOWN_LAYER,
};
pub use pipeline::{ingest, ingest_path, IngestReport, ParseOutcome, SourceDocument};
pub use scan::{scan_excerpt, RawExcerpt, TRUNCATION_SENTINEL};
pub use strategy::{select, Strategy};
