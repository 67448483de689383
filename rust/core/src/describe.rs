// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Description synthesis.
//!
//! Renders the ingestion outcome into the natural-language briefing handed
//! to the downstream generative system. Four narrative branches: structured
//! or excerpt-based reading, crossed with a recognized or unrecognized
//! space. Entirely deterministic: counts are enumerated in sorted order and
//! the closing instruction block is static text.

use crate::classify::Classification;
use crate::pipeline::ParseOutcome;
use std::fmt::Write;

/// How many excerpt lines are quoted in a degraded description.
const EXCERPT_PREFIX_LINES: usize = 12;

/// Fixed closing block describing the desired downstream rendering style.
const CLOSING_INSTRUCTIONS: &str = "\
Render this as a short, plain-language briefing for an interior design \
assistant: describe the space in complete sentences, avoid CAD jargon and \
raw group codes, and keep the tone neutral and factual.";

/// Render the description for one ingested document. Total: every
/// combination of outcome and classification produces text.
pub fn describe(
    filename: &str,
    outcome: &ParseOutcome,
    classification: &Classification,
) -> String {
    let mut text = String::new();

    match outcome {
        ParseOutcome::Structured {
            stats, truncated, ..
        } => {
            match classification.label {
                Some(label) => {
                    let _ = writeln!(
                        text,
                        "The drawing \"{}\" appears to depict a {} (keyword evidence: {}).",
                        filename,
                        label,
                        classification.evidence.join(", ")
                    );
                }
                None => {
                    let _ = writeln!(
                        text,
                        "The drawing \"{}\" does not match a known space category.",
                        filename
                    );
                }
            }
            let _ = writeln!(
                text,
                "A structural read of the model space found {} entities.",
                stats.total()
            );
            if *truncated {
                text.push_str(
                    "The enumerated entity list was capped; the counts below still cover the full drawing.\n",
                );
            }

            text.push_str("\nEntities by type:\n");
            for (entity_type, count) in stats.types_sorted() {
                let _ = writeln!(text, "  - {}: {}", entity_type, count);
            }
            text.push_str("\nEntities by layer:\n");
            for (layer, count) in stats.layers_sorted() {
                let _ = writeln!(text, "  - {}: {}", layer, count);
            }
        }
        ParseOutcome::RawExcerpt { lines, truncated } => {
            match classification.label {
                Some(label) => {
                    let _ = writeln!(
                        text,
                        "The drawing \"{}\" appears to depict a {} (keyword evidence: {}).",
                        filename,
                        label,
                        classification.evidence.join(", ")
                    );
                }
                None => {
                    let _ = writeln!(
                        text,
                        "The drawing \"{}\" does not match a known space category.",
                        filename
                    );
                }
            }
            text.push_str(
                "Only a partial, line-oriented reading was possible; the drawing's structure could not be interpreted in full.\n",
            );
            if *truncated {
                text.push_str("The excerpt below was cut at the configured line cap.\n");
            }

            text.push_str("\nExcerpt of the source:\n");
            for line in lines.iter().take(EXCERPT_PREFIX_LINES) {
                let _ = writeln!(text, "  | {}", line);
            }
        }
        // Not reached by the pipeline, which stops before describing
        // rejected or unreadable documents. Kept total anyway.
        ParseOutcome::Rejected { size, limit } => {
            let _ = writeln!(
                text,
                "The drawing \"{}\" was not ingested: {} bytes exceeds the {} byte ceiling.",
                filename, size, limit
            );
        }
        ParseOutcome::Failed { reason } => {
            let _ = writeln!(
                text,
                "The drawing \"{}\" could not be read: {}.",
                filename, reason
            );
        }
    }

    text.push('\n');
    text.push_str(CLOSING_INSTRUCTIONS);
    text
}
