// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end pipeline scenarios.

use archimaestro_core::{
    ingest, select, ParseOutcome, PipelineConfig, SourceDocument, Strategy,
};

/// Build a well-formed DXF with `line_count` LINE entities on layer "MURI"
/// and one TEXT entity on layer "BAGNO".
fn sample_dxf(line_count: usize) -> String {
    let mut out = String::from("0\nSECTION\n2\nHEADER\n0\nENDSEC\n0\nSECTION\n2\nENTITIES\n");
    for _ in 0..line_count {
        out.push_str("0\nLINE\n8\nMURI\n10\n0.0\n20\n0.0\n11\n4.2\n21\n0.0\n");
    }
    out.push_str("0\nTEXT\n8\nBAGNO\n1\nvasca\n");
    out.push_str("0\nENDSEC\n0\nEOF\n");
    out
}

#[test]
fn scenario_a_small_wellformed_bathroom() {
    let content = sample_dxf(3);
    assert!(content.len() < 2048);

    let doc = SourceDocument::new("bagno.dxf", content.as_bytes());
    let report = ingest(&doc, &PipelineConfig::default());

    let ParseOutcome::Structured {
        stats, truncated, ..
    } = &report.outcome
    else {
        panic!("expected structured outcome, got {:?}", report.outcome);
    };
    assert!(!truncated);
    assert_eq!(stats.by_type.get("LINE"), Some(&3));
    assert_eq!(stats.by_type.get("TEXT"), Some(&1));
    assert_eq!(stats.by_layer.get("MURI"), Some(&3));
    assert_eq!(stats.by_layer.get("BAGNO"), Some(&1));

    let classification = report.classification.expect("classification");
    assert_eq!(classification.label, Some("bathroom"));
    assert_eq!(classification.evidence.to_vec(), vec!["bagno".to_string()]);

    let description = report.description.expect("description");
    assert!(description.contains("bathroom"));
    assert!(description.contains("LINE: 3"));
}

#[test]
fn scenario_b_oversized_is_rejected_unread() {
    // Content that would blow up both parsers if ever touched: the size
    // gate must fire on metadata alone.
    let config = PipelineConfig {
        reject_above_bytes: 1024,
        ..PipelineConfig::default()
    };
    let junk = vec![0xFFu8; 2048];
    let doc = SourceDocument::new("huge.dxf", &junk);

    assert_eq!(select(doc.byte_size(), &config), Strategy::Reject);

    let report = ingest(&doc, &config);
    match report.outcome {
        ParseOutcome::Rejected { size, limit } => {
            assert_eq!(size, 2048);
            assert_eq!(limit, 1024);
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert!(report.classification.is_none());
    assert!(report.description.is_none());
}

#[test]
fn scenario_c_structural_failure_degrades_to_excerpt() {
    let content = "this is not a dxf file\njust some prose\nabout a cucina renovation\n";
    let doc = SourceDocument::new("notes.txt", content.as_bytes());
    let report = ingest(&doc, &PipelineConfig::default());

    let ParseOutcome::RawExcerpt { lines, truncated } = &report.outcome else {
        panic!("expected raw excerpt, got {:?}", report.outcome);
    };
    assert!(!truncated);
    assert_eq!(lines.len(), 3);

    // Classification still sees the excerpt text.
    let classification = report.classification.expect("classification");
    assert_eq!(classification.label, Some("kitchen"));

    let description = report.description.expect("description");
    assert!(description.contains("partial, line-oriented reading"));
}

#[test]
fn scenario_d_large_wellformed_skips_structural_parser() {
    // Well-formed DXF above the full-parse threshold: the strategy goes
    // straight to the scanner. Were the structural parser invoked, the
    // outcome would be Structured.
    let content = sample_dxf(5);
    let config = PipelineConfig {
        full_parse_below_bytes: 64,
        ..PipelineConfig::default()
    };
    let doc = SourceDocument::new("piano_terra.dxf", content.as_bytes());
    assert!(doc.byte_size() > config.full_parse_below_bytes);
    assert_eq!(select(doc.byte_size(), &config), Strategy::SmartScan);

    let report = ingest(&doc, &config);
    assert!(matches!(report.outcome, ParseOutcome::RawExcerpt { .. }));
}

#[test]
fn truncation_cap_is_exact_and_counts_stay_true() {
    let content = sample_dxf(50); // 51 entities total
    let config = PipelineConfig {
        max_enumerated_entities: 10,
        ..PipelineConfig::default()
    };
    let doc = SourceDocument::new("plan.dxf", content.as_bytes());
    let report = ingest(&doc, &config);

    let ParseOutcome::Structured {
        entities,
        stats,
        truncated,
    } = &report.outcome
    else {
        panic!("expected structured outcome");
    };
    assert!(truncated);
    assert_eq!(entities.len(), 10);
    assert_eq!(stats.total(), 51);
    assert_eq!(
        stats.by_type.values().sum::<usize>(),
        stats.by_layer.values().sum::<usize>()
    );
}

#[test]
fn below_cap_is_not_truncated() {
    let content = sample_dxf(5); // 6 entities total
    let config = PipelineConfig {
        max_enumerated_entities: 6,
        ..PipelineConfig::default()
    };
    let doc = SourceDocument::new("plan.dxf", content.as_bytes());
    let report = ingest(&doc, &config);

    let ParseOutcome::Structured {
        entities,
        truncated,
        ..
    } = &report.outcome
    else {
        panic!("expected structured outcome");
    };
    assert!(!truncated);
    assert_eq!(entities.len(), 6);
}

#[test]
fn scan_line_cap_bounds_excerpt() {
    let mut content = String::new();
    for i in 0..100 {
        content.push_str(&format!("prose line {i}\n"));
    }
    let config = PipelineConfig {
        max_scan_lines: 20,
        ..PipelineConfig::default()
    };
    let doc = SourceDocument::new("notes.txt", content.as_bytes());
    let report = ingest(&doc, &config);

    let ParseOutcome::RawExcerpt { lines, truncated } = &report.outcome else {
        panic!("expected raw excerpt");
    };
    assert!(truncated);
    assert_eq!(lines.len(), 21); // cap + sentinel
}

#[test]
fn invalid_utf8_never_panics() {
    let mut bytes = b"0\nSECTION\n".to_vec();
    bytes.extend_from_slice(&[0xC3, 0x28, 0xFF, 0xFE, b'\n']);
    bytes.extend_from_slice(b"2\nENTITIES\n");
    let doc = SourceDocument::new("mangled.dxf", &bytes);
    let report = ingest(&doc, &PipelineConfig::default());
    // Structural path refuses dirty bytes, fallback repairs them.
    assert!(matches!(report.outcome, ParseOutcome::RawExcerpt { .. }));
    assert!(report.description.is_some());
}

#[test]
fn ingest_path_unreadable_source_fails_distinctly() {
    let report = archimaestro_core::ingest_path(
        std::path::Path::new("/nonexistent/archimaestro/missing.dxf"),
        &PipelineConfig::default(),
    );
    assert!(matches!(report.outcome, ParseOutcome::Failed { .. }));
    assert!(report.description.is_none());
}
