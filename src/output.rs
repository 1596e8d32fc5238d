use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::models::FetchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Simple,
}

/// Render a fetch result for the chosen output surface.
///
/// `json` is a pretty-printed (2-space) serialization with non-ASCII kept
/// literal; `simple` is a short human-readable block with one line per
/// candidate in its raw debug form.
pub fn render(result: &FetchResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(result).context("Failed to serialize fetch result")
        }
        OutputFormat::Simple => {
            let mut out = format!("Available dates for {}:\n", result.event);
            out.push_str(&format!("Fetched: {}\n", result.fetch_timestamp));
            out.push_str(&format!(
                "Total dates found: {}\n\n",
                result.total_dates_found
            ));
            for candidate in &result.available_dates {
                out.push_str(&format!("- {candidate:?}\n"));
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateCandidate;
    use pretty_assertions::assert_eq;

    fn result() -> FetchResult {
        FetchResult::new(
            "Cenacolo Vinciano",
            "https://cenacolovinciano.vivaticket.it/en/event/cenacolo-vinciano/151991",
            vec![DateCandidate {
                selector: r#"[class*="day"]"#.to_string(),
                text: "12 maggio, già prenotato".to_string(),
                date_attribute: Some("2024-05-12".to_string()),
                classes: "day available".to_string(),
                available: true,
            }],
        )
    }

    #[test]
    fn json_output_round_trips() {
        let result = result();
        let rendered = render(&result, OutputFormat::Json).unwrap();
        let parsed: FetchResult = serde_json::from_str(&rendered).unwrap();

        assert_eq!(parsed.event, result.event);
        assert_eq!(parsed.event_url, result.event_url);
        assert_eq!(parsed.total_dates_found, result.total_dates_found);
        assert_eq!(parsed.available_dates.len(), result.available_dates.len());
    }

    #[test]
    fn json_output_keeps_non_ascii_literal() {
        let rendered = render(&result(), OutputFormat::Json).unwrap();
        assert!(rendered.contains("già prenotato"));
        assert!(!rendered.contains("\\u"));
    }

    #[test]
    fn json_output_uses_two_space_indent() {
        let rendered = render(&result(), OutputFormat::Json).unwrap();
        assert!(rendered.contains("\n  \"event\": \"Cenacolo Vinciano\""));
    }

    #[test]
    fn simple_output_lists_one_line_per_candidate() {
        let result = result();
        let rendered = render(&result, OutputFormat::Simple).unwrap();

        assert!(rendered.starts_with("Available dates for Cenacolo Vinciano:\n"));
        assert!(rendered.contains(&format!("Fetched: {}\n", result.fetch_timestamp)));
        assert!(rendered.contains("Total dates found: 1\n"));
        assert_eq!(
            rendered.lines().filter(|l| l.starts_with("- ")).count(),
            result.available_dates.len()
        );
    }
}
