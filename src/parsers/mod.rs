use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;

/// Class-name substrings that mark a calendar cell as not bookable.
pub const UNAVAILABLE_MARKERS: &[&str] = &["disabled", "unavailable", "sold-out"];

static DATE_LIKE_REGEX: Lazy<Regex> = Lazy::new(|| {
    // ISO dates plus the slashed forms European booking sites tend to emit.
    Regex::new(r"\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{2,4}").expect("Invalid date regex")
});

/// Clean and normalize text by removing extra whitespace and decoding HTML entities
pub fn clean_text(text: &str) -> String {
    let decoded = decode_html_entities(text);
    decoded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Pick the first attribute with a non-empty value, in priority order.
pub fn pick_date_attribute<'a>(
    attributes: &[&str],
    mut read: impl FnMut(&str) -> Option<&'a str>,
) -> Option<String> {
    attributes.iter().find_map(|name| {
        read(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}

/// Availability is a substring check against the class list; anything not
/// explicitly marked is assumed bookable.
pub fn is_available(markers: &[&str], classes: &str) -> bool {
    let lowered = classes.to_lowercase();
    !markers.iter().any(|marker| lowered.contains(marker))
}

/// Whether a scraped string carries something that looks like an actual
/// date. Diagnostic only, the heuristic never filters on this.
pub fn looks_like_date(value: &str) -> bool {
    DATE_LIKE_REGEX.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clean_text_collapses_whitespace_and_decodes_entities() {
        assert_eq!(clean_text("  12\n\t "), "12");
        assert_eq!(clean_text("Sat &amp; Sun"), "Sat & Sun");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn availability_markers_are_case_insensitive_substrings() {
        assert!(is_available(UNAVAILABLE_MARKERS, "day available"));
        assert!(is_available(UNAVAILABLE_MARKERS, ""));
        assert!(!is_available(UNAVAILABLE_MARKERS, "day disabled"));
        assert!(!is_available(UNAVAILABLE_MARKERS, "day SOLD-OUT"));
        assert!(!is_available(UNAVAILABLE_MARKERS, "cell is-unavailable"));
    }

    #[test]
    fn first_non_empty_attribute_wins() {
        let attrs = [("data-date", "A"), ("aria-label", "B")];
        let picked = pick_date_attribute(&["data-date", "data-value", "aria-label", "title"], |n| {
            attrs.iter().find(|(k, _)| *k == n).map(|(_, v)| *v)
        });
        assert_eq!(picked.as_deref(), Some("A"));
    }

    #[test]
    fn empty_attribute_values_are_skipped() {
        let attrs = [("data-date", "  "), ("title", "12 May")];
        let picked = pick_date_attribute(&["data-date", "data-value", "aria-label", "title"], |n| {
            attrs.iter().find(|(k, _)| *k == n).map(|(_, v)| *v)
        });
        assert_eq!(picked.as_deref(), Some("12 May"));
    }

    #[test]
    fn date_likeness_sniffing() {
        assert!(looks_like_date("2024-05-12"));
        assert!(looks_like_date("Saturday 12/05/2024"));
        assert!(!looks_like_date("12"));
        assert!(!looks_like_date("Prenota"));
    }
}
