// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fallback line scanner.
//!
//! Structure-agnostic, best-effort reading used when the document is too
//! large for a structural parse or when the parser reports a structural
//! error. Bytes are decoded permissively (invalid sequences are replaced),
//! so this path is total over arbitrary input.

/// Sentinel appended when the line cap was reached before end of input.
pub const TRUNCATION_SENTINEL: &str = "... [truncated]";

/// Unstructured excerpt of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawExcerpt {
    /// At most `max_lines` lines, plus the sentinel when truncated.
    pub lines: Vec<String>,
    /// Set when the source had more lines than the cap.
    pub truncated: bool,
}

/// Collect at most `max_lines` text lines from `bytes`.
///
/// Never fails: each line is decoded lossily on its own, so a corrupt byte
/// run damages one line, not the whole excerpt.
pub fn scan_excerpt(bytes: &[u8], max_lines: usize) -> RawExcerpt {
    let mut lines = Vec::with_capacity(max_lines.min(256));
    let mut truncated = false;

    let mut start = 0;
    while start <= bytes.len() {
        let end = match memchr::memchr(b'\n', &bytes[start..]) {
            Some(offset) => start + offset,
            None => bytes.len(),
        };
        // Skip the empty slice after a trailing newline.
        if end == bytes.len() && start == end {
            break;
        }

        if lines.len() == max_lines {
            truncated = true;
            break;
        }

        let mut raw = &bytes[start..end];
        if raw.last() == Some(&b'\r') {
            raw = &raw[..raw.len() - 1];
        }
        lines.push(String::from_utf8_lossy(raw).into_owned());

        if end == bytes.len() {
            break;
        }
        start = end + 1;
    }

    if truncated {
        lines.push(TRUNCATION_SENTINEL.to_string());
    }

    RawExcerpt { lines, truncated }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_basic() {
        let excerpt = scan_excerpt(b"0\nSECTION\n2\nHEADER\n", 10);
        assert_eq!(excerpt.lines, vec!["0", "SECTION", "2", "HEADER"]);
        assert!(!excerpt.truncated);
    }

    #[test]
    fn test_scan_crlf_and_no_trailing_newline() {
        let excerpt = scan_excerpt(b"alpha\r\nbeta", 10);
        assert_eq!(excerpt.lines, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_scan_truncates_with_sentinel() {
        let excerpt = scan_excerpt(b"a\nb\nc\nd\ne\n", 3);
        assert!(excerpt.truncated);
        assert_eq!(excerpt.lines.len(), 4); // cap + sentinel
        assert_eq!(excerpt.lines[3], TRUNCATION_SENTINEL);
    }

    #[test]
    fn test_scan_exact_cap_is_not_truncated() {
        let excerpt = scan_excerpt(b"a\nb\nc\n", 3);
        assert!(!excerpt.truncated);
        assert_eq!(excerpt.lines.len(), 3);
    }

    #[test]
    fn test_scan_invalid_utf8_is_repaired() {
        let excerpt = scan_excerpt(b"ok\n\xff\xfe\xfd\nalso ok\n", 10);
        assert_eq!(excerpt.lines.len(), 3);
        assert_eq!(excerpt.lines[0], "ok");
        assert!(excerpt.lines[1].contains('\u{FFFD}'));
        assert_eq!(excerpt.lines[2], "also ok");
    }

    #[test]
    fn test_scan_arbitrary_bytes_bounded() {
        // Pseudo-random junk with embedded newlines; the only guarantees
        // are totality and the cap.
        let mut junk = Vec::new();
        let mut state = 0x9e3779b9u32;
        for _ in 0..4096 {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            junk.push((state >> 24) as u8);
        }
        let excerpt = scan_excerpt(&junk, 50);
        assert!(excerpt.lines.len() <= 51);
    }

    #[test]
    fn test_scan_empty() {
        let excerpt = scan_excerpt(b"", 10);
        assert!(excerpt.lines.is_empty());
        assert!(!excerpt.truncated);
    }
}
