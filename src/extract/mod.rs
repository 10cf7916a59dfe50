pub mod events;
pub mod tables;

use tracing::{info, warn};

use crate::page::YearPage;

/// Extracted but unvalidated paragraph text. Duplicates across documents
/// are expected and removed by normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub year: i32,
    pub text: String,
}

/// Extracted but unvalidated table block. Header arity need not match each
/// row; the statistics normalizer reconciles shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub year: i32,
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn extract_year(year: i32, page: &YearPage) -> (Vec<RawEvent>, Vec<RawTable>) {
    (events::extract(year, page), tables::extract(year, page))
}

/// Parse and extract each fetched document into the two accumulated raw
/// sets. A failed year only warns and contributes nothing; the remaining
/// years extract in full.
pub fn accumulate(
    docs: impl IntoIterator<Item = (i32, anyhow::Result<String>)>,
) -> (Vec<RawEvent>, Vec<RawTable>) {
    let mut all_events = Vec::new();
    let mut all_tables = Vec::new();

    for (year, doc) in docs {
        match doc {
            Ok(html) => {
                let page = YearPage::parse(&html);
                let (events, tables) = extract_year(year, &page);
                info!("{}: {} events, {} tables", year, events.len(), tables.len());
                all_events.extend(events);
                all_tables.extend(tables);
            }
            Err(e) => warn!("Skipping {}: {}", year, e),
        }
    }

    (all_events, all_tables)
}

// ── Tests ──
