use scraper::{Html, Selector};
use tracing::{info, warn};

use crate::browser::Trigger;
use crate::models::DateCandidate;
use crate::parsers::{clean_text, is_available, pick_date_attribute};

mod vivaticket;

pub use vivaticket::VivaTicket;

/// Per-selector cap on extracted nodes.
const MAX_ELEMENTS_PER_SELECTOR: usize = 100;

/// Everything about one target site the orchestration must not know:
/// the probe selectors, the attribute priority list, the availability
/// keywords and the consent/booking click targets. Swapping the target
/// site means swapping the adapter, nothing else.
pub trait CalendarSite: Send + Sync {
    fn event_name(&self) -> &str;
    fn event_url(&self) -> &str;

    /// Ordered probe selectors; earlier entries are the more calendar-
    /// specific guesses.
    fn probe_selectors(&self) -> &[&'static str];

    /// Attributes that may carry the machine-readable date, in priority
    /// order.
    fn date_attributes(&self) -> &[&'static str];

    /// Class-name substrings that mark a cell as not bookable.
    fn unavailable_markers(&self) -> &[&'static str];

    /// Click targets for dismissing a cookie/privacy banner.
    fn consent_triggers(&self) -> &[Trigger];

    /// Click targets expected to reveal the calendar when no dates are
    /// initially visible.
    fn booking_triggers(&self) -> &[Trigger];
}

/// Probe a page snapshot with the site's selector list and collect every
/// node that looks date-like.
///
/// Best-effort by design: the target markup is unknown ahead of time, so
/// this casts a wide net and accepts duplicates when several selectors
/// match the same node. Unparsable selectors and empty nodes are skipped
/// without aborting the pass.
pub fn extract_candidates(html: &str, site: &dyn CalendarSite) -> Vec<DateCandidate> {
    let document = Html::parse_document(html);
    let mut candidates = Vec::new();

    for selector_str in site.probe_selectors() {
        let selector = match Selector::parse(selector_str) {
            Ok(selector) => selector,
            Err(_) => {
                warn!("Skipping unparsable selector '{}'", selector_str);
                continue;
            }
        };

        let matched: Vec<_> = document.select(&selector).collect();
        if matched.is_empty() {
            continue;
        }
        info!("Found {} elements matching '{}'", matched.len(), selector_str);

        for element in matched.into_iter().take(MAX_ELEMENTS_PER_SELECTOR) {
            if let Some(candidate) = candidate_from_element(selector_str, &element, site) {
                candidates.push(candidate);
            }
        }
    }

    candidates
}

/// A node yields a candidate only if it has visible text or one of the
/// date attributes; anything else is dropped silently.
fn candidate_from_element(
    selector: &str,
    element: &scraper::ElementRef<'_>,
    site: &dyn CalendarSite,
) -> Option<DateCandidate> {
    let text = clean_text(&element.text().collect::<String>());
    let date_attribute =
        pick_date_attribute(site.date_attributes(), |name| element.value().attr(name));
    let classes = element.value().attr("class").unwrap_or("").to_string();

    if text.is_empty() && date_attribute.is_none() {
        return None;
    }

    Some(DateCandidate {
        selector: selector.to_string(),
        text,
        available: is_available(site.unavailable_markers(), &classes),
        date_attribute,
        classes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn site() -> VivaTicket {
        VivaTicket::default()
    }

    fn page(body: &str) -> String {
        format!("<html><body>{body}</body></html>")
    }

    #[test]
    fn page_without_matches_yields_nothing() {
        let html = page("<p>Nothing calendar-shaped here</p>");
        assert!(extract_candidates(&html, &site()).is_empty());
    }

    #[test]
    fn day_cell_with_date_attribute_is_extracted() {
        let html = page(r#"<div class="day available" data-date="2024-05-12">12</div>"#);
        let candidates = extract_candidates(&html, &site());

        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.selector, r#"[class*="day"]"#);
        assert_eq!(c.text, "12");
        assert_eq!(c.date_attribute.as_deref(), Some("2024-05-12"));
        assert_eq!(c.classes, "day available");
        assert!(c.available);
    }

    #[test]
    fn sold_out_cell_is_marked_unavailable() {
        let html = page(r#"<div class="day sold-out">12</div>"#);
        let candidates = extract_candidates(&html, &site());

        assert_eq!(candidates.len(), 1);
        assert!(!candidates[0].available);
    }

    #[test]
    fn disabled_and_unavailable_markers_apply_case_insensitively() {
        let html = page(concat!(
            r#"<div class="day DISABLED">1</div>"#,
            r#"<div class="day is-unavailable">2</div>"#,
            r#"<div class="day">3</div>"#,
        ));
        let flags: Vec<bool> = extract_candidates(&html, &site())
            .into_iter()
            .map(|c| c.available)
            .collect();
        assert_eq!(flags, vec![false, false, true]);
    }

    #[test]
    fn data_date_outranks_aria_label() {
        let html = page(r#"<div class="day" data-date="A" aria-label="B">12</div>"#);
        let candidates = extract_candidates(&html, &site());
        assert_eq!(candidates[0].date_attribute.as_deref(), Some("A"));
    }

    #[test]
    fn empty_node_without_date_attribute_is_skipped() {
        let html = page(r#"<div class="day">   </div>"#);
        assert!(extract_candidates(&html, &site()).is_empty());
    }

    #[test]
    fn empty_text_with_date_attribute_still_counts() {
        let html = page(r#"<div class="day" title="12 May 2024"></div>"#);
        let candidates = extract_candidates(&html, &site());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "");
        assert_eq!(candidates[0].date_attribute.as_deref(), Some("12 May 2024"));
    }

    #[test]
    fn one_node_can_match_several_selectors() {
        // "date-cell day" is hit by both [class*="date"] and [class*="day"];
        // duplicates are intentional.
        let html = page(r#"<div class="date-cell day" data-date="2024-05-12">12</div>"#);
        let candidates = extract_candidates(&html, &site());

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].selector, r#"[class*="date"]"#);
        assert_eq!(candidates[1].selector, r#"[class*="day"]"#);
    }

    #[test]
    fn per_selector_extraction_is_capped() {
        let cells: String = (0..150)
            .map(|i| format!(r#"<div class="day">{i}</div>"#))
            .collect();
        let candidates = extract_candidates(&page(&cells), &site());
        assert_eq!(candidates.len(), MAX_ELEMENTS_PER_SELECTOR);
    }

    #[test]
    fn gridcell_role_is_probed() {
        let html = page(
            r#"<table><tr><td role="gridcell" aria-label="May 12">12</td></tr></table>"#,
        );
        let candidates = extract_candidates(&html, &site());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].date_attribute.as_deref(), Some("May 12"));
    }
}
