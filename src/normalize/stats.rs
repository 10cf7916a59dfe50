use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::{apply_rules, DropTally, Rule};
use crate::db::StatRow;
use crate::extract::RawTable;

static HISTORY_STANDINGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)History|Standings").unwrap());

/// A flattened table row: the table's own headers as column names plus the
/// synthetic year/table_name columns. Missing trailing cells are simply
/// absent keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Candidate {
    year: i32,
    table_name: String,
    cells: BTreeMap<String, String>,
}

impl Candidate {
    fn cell(&self, key: &str) -> Option<&str> {
        self.cells.get(key).map(String::as_str)
    }

    fn missing(&self, key: &str) -> bool {
        self.cell(key).map_or(true, str::is_empty)
    }
}

/// Relevance comes first so irrelevant tables are never scanned by the
/// row heuristics below.
const RELEVANCE_RULES: &[Rule<Candidate>] = &[Rule {
    name: "not_player_review",
    rejects: |c| !c.table_name.to_lowercase().contains("player review"),
}];

const ROW_RULES: &[Rule<Candidate>] = &[
    // Residual header row leaked into the data rows.
    Rule {
        name: "statistic_header_leak",
        rejects: |c| c.cell("Statistic").is_some_and(|v| v.eq_ignore_ascii_case("statistic")),
    },
    Rule {
        name: "statistic_history_standings",
        rejects: |c| c.cell("Statistic").is_some_and(|v| HISTORY_STANDINGS_RE.is_match(v)),
    },
    Rule {
        name: "missing_key_column",
        rejects: |c| c.missing("Statistic") || c.missing("Name") || c.missing("Team"),
    },
];

/// Full accumulated raw tables in, canonical stat rows out. String
/// heuristics run before the numeric coercion so a type failure is the
/// last reason a row can drop.
pub fn normalize(raw: Vec<RawTable>) -> (Vec<StatRow>, DropTally) {
    let mut tally = DropTally::default();

    let mut candidates = flatten(raw);

    let mut seen: HashSet<Candidate> = HashSet::new();
    candidates.retain(|c| {
        if seen.insert(c.clone()) {
            true
        } else {
            tally.add("duplicate");
            false
        }
    });

    let candidates = apply_rules(candidates, RELEVANCE_RULES, &mut tally);
    let candidates: Vec<Candidate> = candidates.into_iter().map(trim_candidate).collect();
    let candidates = apply_rules(candidates, ROW_RULES, &mut tally);

    let mut rows = Vec::new();
    for c in candidates {
        // Only the column literally named '#' is coerced; tables naming the
        // concept differently fall out here.
        let value = c
            .cell("#")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite());
        let Some(stat_value) = value else {
            tally.add("missing_stat_value");
            continue;
        };
        rows.push(StatRow {
            statistic: c.cell("Statistic").unwrap_or_default().to_string(),
            name: c.cell("Name").unwrap_or_default().to_string(),
            team: c.cell("Team").unwrap_or_default().to_string(),
            stat_value,
            year: c.year,
            table_name: c.table_name,
        });
    }

    (rows, tally)
}

/// Each table becomes its own small record set keyed by its own headers.
/// A short row leaves trailing columns absent; extra cells beyond the
/// header arity are ignored.
fn flatten(raw: Vec<RawTable>) -> Vec<Candidate> {
    let mut out = Vec::new();
    for table in raw {
        for row in &table.rows {
            let cells: BTreeMap<String, String> = table
                .headers
                .iter()
                .zip(row.iter())
                .map(|(header, value)| (header.clone(), value.clone()))
                .collect();
            out.push(Candidate {
                year: table.year,
                table_name: table.title.clone(),
                cells,
            });
        }
    }
    out
}

/// Trim header names and values. On a post-trim header collision the later
/// column wins.
fn trim_candidate(c: Candidate) -> Candidate {
    Candidate {
        year: c.year,
        table_name: c.table_name.trim().to_string(),
        cells: c
            .cells
            .into_iter()
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect(),
    }
}

// ── Tests ──
