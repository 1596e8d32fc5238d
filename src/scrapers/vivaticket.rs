use crate::browser::Trigger;
use crate::scrapers::CalendarSite;

/// The VivaTicket event page for the Cenacolo Vinciano.
///
/// The calendar markup on this site is not confirmed, so the probe list
/// covers the usual suspects (generic calendar/date/day classes, date
/// data-attributes, ARIA grid cells, FullCalendar, generic date pickers).
/// Expect this list to need maintenance whenever the site changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct VivaTicket;

const EVENT_NAME: &str = "Cenacolo Vinciano";
const EVENT_URL: &str = "https://cenacolovinciano.vivaticket.it/en/event/cenacolo-vinciano/151991";

const PROBE_SELECTORS: &[&str] = &[
    r#"[class*="calendar"]"#,
    r#"[class*="date"]"#,
    r#"[class*="day"]"#,
    "button[data-date]",
    ".available-date",
    r#"[role="gridcell"]"#,
    ".fc-day",
    r#"[class*="DatePicker"]"#,
];

const DATE_ATTRIBUTES: &[&str] = &["data-date", "data-value", "aria-label", "title"];

const CONSENT_TRIGGERS: &[Trigger] = &[
    Trigger::Text { scope: "button", needle: "Accept" },
    Trigger::Text { scope: "button", needle: "Accetta" },
    Trigger::Text { scope: "button", needle: "Agree" },
    Trigger::Css(r#"[id*="cookie"] button"#),
    Trigger::Css(r#"[class*="cookie"] button"#),
];

// Booking phrases in English and Italian; the site serves both.
const BOOKING_TRIGGERS: &[Trigger] = &[
    Trigger::Text { scope: "button", needle: "Book" },
    Trigger::Text { scope: "button", needle: "Prenota" },
    Trigger::Text { scope: "button", needle: "Select" },
    Trigger::Text { scope: "a", needle: "Book" },
];

impl CalendarSite for VivaTicket {
    fn event_name(&self) -> &str {
        EVENT_NAME
    }

    fn event_url(&self) -> &str {
        EVENT_URL
    }

    fn probe_selectors(&self) -> &[&'static str] {
        PROBE_SELECTORS
    }

    fn date_attributes(&self) -> &[&'static str] {
        DATE_ATTRIBUTES
    }

    fn unavailable_markers(&self) -> &[&'static str] {
        crate::parsers::UNAVAILABLE_MARKERS
    }

    fn consent_triggers(&self) -> &[Trigger] {
        CONSENT_TRIGGERS
    }

    fn booking_triggers(&self) -> &[Trigger] {
        BOOKING_TRIGGERS
    }
}
