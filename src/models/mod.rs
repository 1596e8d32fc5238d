use chrono::Local;
use serde::{Deserialize, Serialize};

/// One heuristically-extracted DOM node, tentatively treated as a date entry.
///
/// There is no identity and no dedup: the same visual date shows up once per
/// probe selector that matched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCandidate {
    /// The probe selector that matched the node.
    pub selector: String,
    /// Visible text, whitespace-collapsed. May be empty when a date
    /// attribute was found instead.
    pub text: String,
    /// First non-empty value among the site's date attributes, in priority
    /// order.
    pub date_attribute: Option<String>,
    /// Raw `class` attribute value, empty string if absent.
    pub classes: String,
    /// False iff the class list carries an unavailability marker.
    pub available: bool,
}

/// Top-level output of one fetch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResult {
    pub event: String,
    pub event_url: String,
    /// ISO-8601, local time, stamped at construction.
    pub fetch_timestamp: String,
    /// Always equals `available_dates.len()`.
    pub total_dates_found: usize,
    pub available_dates: Vec<DateCandidate>,
}

impl FetchResult {
    pub fn new(event: &str, event_url: &str, available_dates: Vec<DateCandidate>) -> Self {
        Self {
            event: event.to_string(),
            event_url: event_url.to_string(),
            fetch_timestamp: Local::now().to_rfc3339(),
            total_dates_found: available_dates.len(),
            available_dates,
        }
    }
}
