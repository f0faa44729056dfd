use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate to at most `max_cells` cells, ending in `…` when shortened.
/// Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1;
    let mut used = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let w = display_width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Truncate or right-pad with spaces to exactly `cells` wide.
pub fn fit_to_width(s: &str, cells: usize) -> String {
    let mut out = truncate_to_width(s, cells);
    let w = display_width(&out);
    if w < cells {
        out.push_str(&" ".repeat(cells - w));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(display_width("milk"), 4);
        assert_eq!(display_width("우유"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn truncate_fits_untouched() {
        assert_eq!(truncate_to_width("Buy milk", 8), "Buy milk");
        assert_eq!(truncate_to_width("Buy milk", 20), "Buy milk");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate_to_width("Buy milk", 5), "Buy \u{2026}");
        assert_eq!(truncate_to_width("Buy milk", 1), "\u{2026}");
        assert_eq!(truncate_to_width("Buy milk", 0), "");
    }

    #[test]
    fn truncate_wide_chars_on_boundary() {
        // Each syllable is 2 cells; 4 cells leaves room for one plus the ellipsis
        assert_eq!(truncate_to_width("새로운 할 일", 4), "새\u{2026}");
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit_to_width("ab", 4), "ab  ");
        assert_eq!(fit_to_width("abcdef", 4), "abc\u{2026}");
        assert_eq!(display_width(&fit_to_width("우유 사기", 5)), 5);
    }
}
