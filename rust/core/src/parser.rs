// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DXF structural parser.
//!
//! ASCII DXF is framed as *group pairs*: a group-code line (integer) followed
//! by a value line. Drawable entities live in the `ENTITIES` section; each
//! starts at a `0/<TYPE>` pair and owns the following pairs until the next
//! code 0. Group 8 carries the owning layer, group 67 flags paper space.
//!
//! The parser enumerates model-space entities up to a configured cap while
//! aggregate counts keep accumulating past it, so `by_type`/`by_layer`
//! always reflect the true totals.

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use rustc_hash::FxHashMap;

/// Layer sentinel for entities that never declare group 8.
pub const UNKNOWN_LAYER: &str = "unknown";

/// One drawable record from the ENTITIES section.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawingEntity {
    /// DXF type tag, e.g. `LINE`, `LWPOLYLINE`, `TEXT`.
    pub entity_type: String,
    /// Owning layer name, or [`UNKNOWN_LAYER`].
    pub layer: String,
}

/// Entity counts folded over the whole model space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregatedStats {
    /// Count per entity type tag.
    pub by_type: FxHashMap<String, usize>,
    /// Count per layer name.
    pub by_layer: FxHashMap<String, usize>,
}

impl AggregatedStats {
    /// Record one entity. Counts only ever increase.
    pub fn record(&mut self, entity_type: &str, layer: &str) {
        *self.by_type.entry(entity_type.to_string()).or_insert(0) += 1;
        *self.by_layer.entry(layer.to_string()).or_insert(0) += 1;
    }

    /// True total entity count, independent of the enumeration cap.
    pub fn total(&self) -> usize {
        self.by_type.values().sum()
    }

    /// Type counts in stable (sorted) order. The map's iteration order is an
    /// accident of its hasher and must not leak into rendered output.
    pub fn types_sorted(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<_> = self.by_type.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Layer counts in stable (sorted) order.
    pub fn layers_sorted(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<_> = self.by_layer.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Result of a successful structural parse.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructuredSummary {
    /// Enumerated entities in document order, capped at
    /// `max_enumerated_entities`.
    pub entities: Vec<DrawingEntity>,
    /// True aggregate counts, never capped.
    pub stats: AggregatedStats,
    /// Set when the enumeration cap was reached before the section ended.
    pub truncated: bool,
}

/// One group pair with its 1-based source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPair<'a> {
    pub code: i16,
    pub value: &'a str,
    pub line: usize,
}

/// Cursor over the group pairs of an ASCII DXF document.
///
/// Line-oriented: each call to [`next_pair`](Self::next_pair) consumes the
/// next code/value line pair. Malformed framing (a non-integer code line, a
/// code with no value line) is a structural error, not a panic.
pub struct GroupPairs<'a> {
    content: &'a str,
    position: usize,
    line: usize,
}

impl<'a> GroupPairs<'a> {
    /// Create a cursor at the start of `content`.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            position: 0,
            line: 0,
        }
    }

    /// Consume one raw line, without trimming. `None` at end of input.
    fn next_line(&mut self) -> Option<&'a str> {
        if self.position >= self.content.len() {
            return None;
        }
        let bytes = self.content.as_bytes();
        let start = self.position;
        let end = match memchr::memchr(b'\n', &bytes[start..]) {
            Some(offset) => start + offset,
            None => self.content.len(),
        };
        self.position = end + 1;
        self.line += 1;
        Some(self.content[start..end].trim_end_matches('\r'))
    }

    /// Consume the next group pair. `Ok(None)` at end of input; trailing
    /// blank lines are tolerated.
    pub fn next_pair(&mut self) -> Result<Option<GroupPair<'a>>> {
        let code_line = loop {
            match self.next_line() {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => break line,
                None => return Ok(None),
            }
        };
        let code_line_no = self.line;

        let trimmed = code_line.trim();
        let code: i16 = lexical_core::parse(trimmed.as_bytes()).map_err(|_| {
            Error::structural(code_line_no, format!("invalid group code {trimmed:?}"))
        })?;

        let value = self.next_line().ok_or_else(|| {
            Error::structural(code_line_no, format!("group code {code} has no value line"))
        })?;

        Ok(Some(GroupPair {
            code,
            value: value.trim(),
            line: code_line_no,
        }))
    }

    /// Reset the cursor to the beginning.
    pub fn reset(&mut self) {
        self.position = 0;
        self.line = 0;
    }
}

/// Entity being assembled while its group pairs stream past.
struct PendingEntity {
    entity_type: String,
    layer: Option<String>,
    paper_space: bool,
}

impl PendingEntity {
    fn new(type_tag: &str) -> Self {
        Self {
            entity_type: type_tag.to_string(),
            layer: None,
            paper_space: false,
        }
    }

    fn finish(self) -> Option<DrawingEntity> {
        if self.paper_space {
            return None;
        }
        Some(DrawingEntity {
            entity_type: self.entity_type,
            layer: self.layer.unwrap_or_else(|| UNKNOWN_LAYER.to_string()),
        })
    }
}

/// Parse the ENTITIES section of `content` into a bounded summary.
///
/// Returns a structural error when the document cannot be interpreted as
/// DXF group pairs or has no ENTITIES section; the caller falls back to
/// the line scanner in that case.
pub fn parse_document(content: &str, config: &PipelineConfig) -> Result<StructuredSummary> {
    let mut pairs = GroupPairs::new(content);

    let mut entities = Vec::new();
    let mut stats = AggregatedStats::default();
    let mut truncated = false;

    let mut in_entities = false;
    let mut seen_entities_section = false;
    let mut awaiting_section_name = false;
    let mut current: Option<PendingEntity> = None;

    let mut emit = |pending: PendingEntity, entities: &mut Vec<DrawingEntity>| {
        if let Some(entity) = pending.finish() {
            stats.record(&entity.entity_type, &entity.layer);
            if entities.len() < config.max_enumerated_entities {
                entities.push(entity);
            } else {
                truncated = true;
            }
        }
    };

    while let Some(pair) = pairs.next_pair()? {
        match pair.code {
            0 => {
                if let Some(pending) = current.take() {
                    emit(pending, &mut entities);
                }
                if in_entities {
                    if pair.value.eq_ignore_ascii_case("ENDSEC") {
                        in_entities = false;
                    } else {
                        current = Some(PendingEntity::new(pair.value));
                    }
                } else if pair.value.eq_ignore_ascii_case("SECTION") {
                    awaiting_section_name = true;
                }
            }
            2 if awaiting_section_name => {
                if pair.value.eq_ignore_ascii_case("ENTITIES") {
                    in_entities = true;
                    seen_entities_section = true;
                }
                awaiting_section_name = false;
            }
            8 => {
                if let Some(pending) = current.as_mut() {
                    pending.layer = Some(pair.value.to_string());
                }
            }
            67 => {
                if let Some(pending) = current.as_mut() {
                    pending.paper_space = pair.value == "1";
                }
            }
            _ => {}
        }
    }

    // Tolerate a missing ENDSEC/EOF pair at end of input.
    if let Some(pending) = current.take() {
        emit(pending, &mut entities);
    }

    if !seen_entities_section {
        return Err(Error::structural(pairs.line, "no ENTITIES section found"));
    }

    Ok(StructuredSummary {
        entities,
        stats,
        truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a minimal DXF document from (code, value) pairs in the
    /// ENTITIES section.
    fn dxf_with_entities(pairs: &[(i16, &str)]) -> String {
        let mut out = String::from("0\nSECTION\n2\nENTITIES\n");
        for (code, value) in pairs {
            out.push_str(&format!("{code}\n{value}\n"));
        }
        out.push_str("0\nENDSEC\n0\nEOF\n");
        out
    }

    #[test]
    fn test_group_pairs_cursor() {
        let mut pairs = GroupPairs::new("  0\nSECTION\n  2\nENTITIES\n");
        let first = pairs.next_pair().unwrap().unwrap();
        assert_eq!(first.code, 0);
        assert_eq!(first.value, "SECTION");
        assert_eq!(first.line, 1);
        let second = pairs.next_pair().unwrap().unwrap();
        assert_eq!(second.code, 2);
        assert_eq!(second.value, "ENTITIES");
        assert!(pairs.next_pair().unwrap().is_none());
    }

    #[test]
    fn test_group_pairs_crlf() {
        let mut pairs = GroupPairs::new("0\r\nLINE\r\n8\r\nMURI\r\n");
        let first = pairs.next_pair().unwrap().unwrap();
        assert_eq!(first.value, "LINE");
        let second = pairs.next_pair().unwrap().unwrap();
        assert_eq!(second.code, 8);
        assert_eq!(second.value, "MURI");
    }

    #[test]
    fn test_group_pairs_bad_code() {
        let mut pairs = GroupPairs::new("LINE\n8\n");
        let err = pairs.next_pair().unwrap_err();
        assert!(matches!(err, Error::Structural { line: 1, .. }));
    }

    #[test]
    fn test_group_pairs_missing_value() {
        let mut pairs = GroupPairs::new("8\nMURI\n0");
        pairs.next_pair().unwrap();
        let err = pairs.next_pair().unwrap_err();
        assert!(matches!(err, Error::Structural { .. }));
    }

    #[test]
    fn test_parse_counts_and_layers() {
        let content = dxf_with_entities(&[
            (0, "LINE"),
            (8, "MURI"),
            (0, "LINE"),
            (8, "MURI"),
            (0, "TEXT"),
            (8, "BAGNO"),
            (1, "vasca"),
        ]);
        let summary = parse_document(&content, &PipelineConfig::default()).unwrap();
        assert_eq!(summary.entities.len(), 3);
        assert_eq!(summary.stats.by_type.get("LINE"), Some(&2));
        assert_eq!(summary.stats.by_type.get("TEXT"), Some(&1));
        assert_eq!(summary.stats.by_layer.get("MURI"), Some(&2));
        assert_eq!(summary.stats.by_layer.get("BAGNO"), Some(&1));
        assert!(!summary.truncated);
    }

    #[test]
    fn test_layer_sentinel() {
        let content = dxf_with_entities(&[(0, "CIRCLE"), (40, "2.5")]);
        let summary = parse_document(&content, &PipelineConfig::default()).unwrap();
        assert_eq!(summary.entities[0].layer, UNKNOWN_LAYER);
    }

    #[test]
    fn test_paper_space_skipped() {
        let content = dxf_with_entities(&[
            (0, "LINE"),
            (8, "MURI"),
            (0, "VIEWPORT"),
            (8, "LAYOUT"),
            (67, "1"),
        ]);
        let summary = parse_document(&content, &PipelineConfig::default()).unwrap();
        assert_eq!(summary.entities.len(), 1);
        assert_eq!(summary.stats.total(), 1);
        assert!(summary.stats.by_type.get("VIEWPORT").is_none());
    }

    #[test]
    fn test_enumeration_cap_keeps_true_counts() {
        let mut pairs = Vec::new();
        for _ in 0..10 {
            pairs.push((0, "LINE"));
            pairs.push((8, "MURI"));
        }
        let content = dxf_with_entities(&pairs);
        let config = PipelineConfig {
            max_enumerated_entities: 4,
            ..PipelineConfig::default()
        };
        let summary = parse_document(&content, &config).unwrap();
        assert_eq!(summary.entities.len(), 4);
        assert!(summary.truncated);
        assert_eq!(summary.stats.by_type.get("LINE"), Some(&10));
        assert_eq!(summary.stats.total(), 10);
    }

    #[test]
    fn test_no_entities_section_is_structural() {
        let content = "0\nSECTION\n2\nHEADER\n0\nENDSEC\n0\nEOF\n";
        let err = parse_document(content, &PipelineConfig::default()).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_entity_block_name_not_section_name() {
        // INSERT carries its own group 2 (block name); it must not be
        // mistaken for a section header.
        let content = dxf_with_entities(&[(0, "INSERT"), (2, "DOORBLOCK"), (8, "PORTE")]);
        let summary = parse_document(&content, &PipelineConfig::default()).unwrap();
        assert_eq!(summary.entities.len(), 1);
        assert_eq!(summary.entities[0].entity_type, "INSERT");
    }

    #[test]
    fn test_sorted_enumeration_is_stable() {
        let mut stats = AggregatedStats::default();
        stats.record("TEXT", "B");
        stats.record("LINE", "A");
        stats.record("LINE", "B");
        assert_eq!(stats.types_sorted(), vec![("LINE", 2), ("TEXT", 1)]);
        assert_eq!(stats.layers_sorted(), vec![("A", 1), ("B", 2)]);
    }
}
