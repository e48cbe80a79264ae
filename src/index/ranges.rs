//! Page list to range collapsing.

/// Collapse an ascending list of distinct pages into compact ranges.
///
/// Runs of consecutive pages render as `start-end`, lone pages as the
/// number itself, joined by `", "`.
///
/// # Example
///
/// ```
/// use pdf_indexer::collapse_ranges;
///
/// assert_eq!(collapse_ranges(&[1, 2, 3, 7, 9, 10]), "1-3, 7, 9-10");
/// assert_eq!(collapse_ranges(&[]), "");
/// ```
pub fn collapse_ranges(pages: &[u32]) -> String {
    let mut runs: Vec<(u32, u32)> = Vec::new();

    for &page in pages {
        match runs.last_mut() {
            Some((_, end)) if end.checked_add(1) == Some(page) => *end = page,
            _ => runs.push((page, page)),
        }
    }

    runs.iter()
        .map(|&(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{}-{}", start, end)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
