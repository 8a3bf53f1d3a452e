//! Remedy-label detection for materia medica blocks.
//!
//! Only a block's first line is inspected, and the heuristic may mislabel
//! or omit; treat the result as best-effort, not authoritative. It is a
//! pure function of the block text so the policy can be swapped without
//! touching block splitting or scoring.

use once_cell::sync::Lazy;
use regex::Regex;

/// Short Title-Case heading: uppercase first letter, then letters, hyphens
/// and spaces, 3 to 40 characters in total.
static TITLE_CASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z \-]{2,39}$").unwrap());

/// Best-effort remedy label for a block of materia medica text.
///
/// A trimmed Title-Case first line is taken verbatim. Failing that, the
/// leading run of the first line up to the first comma or period (at most
/// 60 characters) is used when it starts with a letter. Otherwise the
/// block has no label.
pub fn detect_label(block: &str) -> Option<String> {
    let first = block.lines().next()?.trim();
    if TITLE_CASE.is_match(first) {
        return Some(first.to_string());
    }
    loose_label(first)
}

fn loose_label(line: &str) -> Option<String> {
    if !line.chars().next().is_some_and(|c| c.is_alphabetic()) {
        return None;
    }
    let head: String = line
        .chars()
        .take_while(|&c| c != ',' && c != '.')
        .take(60)
        .collect();
    let head = head.trim_end();
    if head.is_empty() {
        None
    } else {
        Some(head.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_first_line_is_taken_verbatim() {
        assert_eq!(
            detect_label("Aconite\nFear of death."),
            Some("Aconite".to_string())
        );
        assert_eq!(
            detect_label("Nux Vomica\nIrritable and impatient."),
            Some("Nux Vomica".to_string())
        );
        assert_eq!(
            detect_label("Rhus-tox\nWorse on first motion."),
            Some("Rhus-tox".to_string())
        );
    }

    #[test]
    fn test_title_case_bounds() {
        // Too short.
        assert_eq!(detect_label("Ab"), Some("Ab".to_string()));
        // "Ab" fails the Title-Case pattern (length 2) and falls through to
        // the loose rule, which accepts it; a digit-led line gets nothing.
        assert_eq!(detect_label("12 grains of sulphur"), None);
        // Over 40 characters is not Title-Case but the loose rule applies.
        let long = "Belladonna Atropa Deadly Nightshade Herb Extract";
        assert_eq!(detect_label(long), Some(long.to_string()));
    }

    #[test]
    fn test_loose_label_stops_at_comma_or_period() {
        assert_eq!(
            detect_label("aconitum napellus, the monkshood\nMore text."),
            Some("aconitum napellus".to_string())
        );
        assert_eq!(
            detect_label("belladonna. Throbbing pains."),
            Some("belladonna".to_string())
        );
    }

    #[test]
    fn test_loose_label_caps_at_sixty_chars() {
        let line = "a".repeat(80);
        let label = detect_label(&line).unwrap();
        assert_eq!(label.chars().count(), 60);
    }

    #[test]
    fn test_no_label_cases() {
        assert_eq!(detect_label(""), None);
        assert_eq!(detect_label("   \nSome text"), None);
        assert_eq!(detect_label("#12 heading"), None);
        assert_eq!(detect_label(",starts with comma"), None);
    }
}
