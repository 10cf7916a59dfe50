use std::collections::HashSet;

use super::{apply_rules, DropTally, Rule};
use crate::db::EventRow;
use crate::extract::RawEvent;

/// Summary/footer phrases that mark boilerplate rather than real events.
const SUMMARY_BLOCKLIST: &[&str] = &[
    "Statistics League",
    "Team Standings",
    "World Series",
    "All-Star Game",
    "Copyright",
    "All Rights Reserved",
    "Baseball Almanac",
];

const RULES: &[Rule<EventRow>] = &[
    Rule { name: "missing_text", rejects: |e| e.event_detail.is_empty() },
    Rule {
        name: "summary_blocklist",
        rejects: |e| {
            let lower = e.event_detail.to_lowercase();
            SUMMARY_BLOCKLIST
                .iter()
                .any(|phrase| lower.contains(&phrase.to_lowercase()))
        },
    },
    // Multi-section footer rows use "|" as a section separator.
    Rule {
        name: "pipe_sections",
        rejects: |e| e.event_detail.contains('|') && e.event_detail.split('|').count() > 1,
    },
];

/// Full accumulated raw events in, canonical events out. Dedup on
/// (year, trimmed text) first, then the ordered rule list; survivor order
/// is insertion order.
pub fn normalize(raw: Vec<RawEvent>) -> (Vec<EventRow>, DropTally) {
    let mut tally = DropTally::default();

    let mut seen: HashSet<(i32, String)> = HashSet::new();
    let mut rows = Vec::new();
    for event in raw {
        let text = event.text.trim().to_string();
        if !seen.insert((event.year, text.clone())) {
            tally.add("duplicate");
            continue;
        }
        rows.push(EventRow { year: event.year, event_detail: text });
    }

    let rows = apply_rules(rows, RULES, &mut tally);
    (rows, tally)
}

// ── Tests ──
