use super::RawEvent;
use crate::page::YearPage;

/// One RawEvent per paragraph with non-empty trimmed text, in document
/// order. No dedup, no business rules; both belong to normalization.
pub fn extract(year: i32, page: &YearPage) -> Vec<RawEvent> {
    page.paragraphs()
        .into_iter()
        .filter(|text| !text.trim().is_empty())
        .map(|text| RawEvent { year, text })
        .collect()
}
