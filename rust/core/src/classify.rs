// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Keyword-based space classification.
//!
//! A fixed, ordered rule table is tested against the filename plus whatever
//! textual evidence the ingestion produced (layer/type names for a
//! structural parse, excerpt lines for a fallback scan). Matching is
//! case-insensitive substring membership; the first rule with any hit wins
//! and all of its matching keywords are recorded as evidence.
//!
//! This is a deliberately crude heuristic. It is kept as a swappable table
//! rather than inline conditionals so its false positives and negatives can
//! be probed in isolation.

use smallvec::SmallVec;

/// One classification rule: any keyword hit yields `label`.
#[derive(Debug, Clone, Copy)]
pub struct SpaceRule {
    /// Canonical space label, e.g. `"bathroom"`.
    pub label: &'static str,
    /// Lowercase keywords tested as substrings.
    pub keywords: &'static [&'static str],
}

/// Default rule table. Order is the tie-break: earlier rules win.
/// Wet/service rooms come first so generic bedroom keywords ("camera")
/// never shadow them in mixed names.
pub const DEFAULT_RULES: &[SpaceRule] = &[
    SpaceRule {
        label: "bathroom",
        keywords: &["bagno", "bathroom", "bath", "doccia", "shower", "toilet", "wc"],
    },
    SpaceRule {
        label: "kitchen",
        keywords: &["cucina", "kitchen", "cottura"],
    },
    SpaceRule {
        label: "bedroom",
        keywords: &["camera", "letto", "bedroom", "matrimoniale"],
    },
    SpaceRule {
        label: "living room",
        keywords: &["soggiorno", "salotto", "living", "lounge"],
    },
    SpaceRule {
        label: "office",
        keywords: &["ufficio", "office", "studio"],
    },
    SpaceRule {
        label: "garage",
        keywords: &["garage", "autorimessa", "box auto"],
    },
    SpaceRule {
        label: "balcony",
        keywords: &["balcone", "balcony", "terrazza", "terrace"],
    },
];

/// Outcome of a classification attempt.
///
/// Serialize-only under the `serde` feature: labels borrow from the static
/// rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Classification {
    /// Recognized space label, or `None` when no rule matched.
    pub label: Option<&'static str>,
    /// Keywords that triggered the match, in table order.
    pub evidence: SmallVec<[String; 4]>,
}

impl Classification {
    /// The no-match classification.
    pub fn unrecognized() -> Self {
        Self {
            label: None,
            evidence: SmallVec::new(),
        }
    }
}

/// Classify against an explicit rule table.
///
/// Pure: the same filename and corpus always yield the same result.
pub fn classify_with_rules(rules: &[SpaceRule], filename: &str, corpus: &str) -> Classification {
    let haystack = format!("{}\n{}", filename, corpus).to_lowercase();

    for rule in rules {
        let evidence: SmallVec<[String; 4]> = rule
            .keywords
            .iter()
            .filter(|keyword| haystack.contains(*keyword))
            .map(|keyword| keyword.to_string())
            .collect();
        if !evidence.is_empty() {
            return Classification {
                label: Some(rule.label),
                evidence,
            };
        }
    }

    Classification::unrecognized()
}

/// Classify with [`DEFAULT_RULES`].
pub fn classify(filename: &str, corpus: &str) -> Classification {
    classify_with_rules(DEFAULT_RULES, filename, corpus)
}
