//! Term specification parsing.
//!
//! One entry per line, either `Label = term1, term2, ...` or a bare
//! `Term` that labels itself. Malformed lines never fail: `=` alone yields
//! an empty label with no terms, which simply matches nothing.

use crate::model::TermMap;

/// Parse raw multi-line term specifications into a [`TermMap`].
///
/// Blank lines are skipped. A repeated label replaces the earlier entry.
///
/// # Example
///
/// ```
/// use pdf_indexer::parse_terms;
///
/// let terms = parse_terms("Arcadia (Arcadians) = Arcadia, Arcadians\nLight");
/// assert_eq!(terms.get("Light"), Some(&["Light".to_string()][..]));
/// assert_eq!(terms.get("Arcadia (Arcadians)").map(|t| t.len()), Some(2));
/// ```
pub fn parse_terms(raw: &str) -> TermMap {
    let mut map = TermMap::new();

    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match line.split_once('=') {
            Some((label, terms)) => {
                let terms = terms
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect();
                map.insert(label.trim(), terms);
            }
            None => {
                map.insert(line, vec![line.to_string()]);
            }
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_bare_line_labels_itself() {
        let map = parse_terms("Light");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("Light"), Some(&terms(&["Light"])[..]));
    }

    #[test]
    fn test_label_with_synonyms() {
        let map = parse_terms("Arcadia (Arcadians) = Arcadia, Arcadians");
        assert_eq!(
            map.get("Arcadia (Arcadians)"),
            Some(&terms(&["Arcadia", "Arcadians"])[..])
        );
    }

    #[test]
    fn test_duplicate_label_last_wins() {
        let map = parse_terms("A = x\nA = y");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("A"), Some(&terms(&["y"])[..]));
    }

    #[test]
    fn test_splits_on_first_equals_only() {
        let map = parse_terms("Equation = a=b, c");
        assert_eq!(map.get("Equation"), Some(&terms(&["a=b", "c"])[..]));
    }

    #[test]
    fn test_blank_lines_and_empty_pieces() {
        let map = parse_terms("\n   \n  Conan, King = King Conan, , \n\n");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("Conan, King"), Some(&terms(&["King Conan"])[..]));
    }

    #[test]
    fn test_lone_equals_degrades_gracefully() {
        let map = parse_terms("=");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(""), Some(&[][..]));
    }

    #[test]
    fn test_windows_line_endings() {
        let map = parse_terms("Fire = fire, flame\r\nLight\r\n");
        assert_eq!(map.get("Fire"), Some(&terms(&["fire", "flame"])[..]));
        assert_eq!(map.get("Light"), Some(&terms(&["Light"])[..]));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_terms("").is_empty());
        assert!(parse_terms(" \n\t\n").is_empty());
    }
}
