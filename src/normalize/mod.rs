pub mod events;
pub mod stats;

use tracing::info;

/// One keep/reject predicate with a reason tag. Normalizers fold over an
/// ordered rule list so new heuristics slot in without restructuring
/// control flow.
pub struct Rule<R> {
    pub name: &'static str,
    pub rejects: fn(&R) -> bool,
}

/// Per-reason reject counts, in first-hit order.
#[derive(Debug, Default)]
pub struct DropTally {
    entries: Vec<(&'static str, usize)>,
}

impl DropTally {
    pub fn add(&mut self, name: &'static str) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((name, 1)),
        }
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn count(&self, name: &str) -> usize {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    pub fn log(&self, stage: &str) {
        for (name, count) in &self.entries {
            info!("{}: dropped {} row(s): {}", stage, count, name);
        }
    }
}

/// Rejections are expected, silent drops; they surface only as counts.
pub fn apply_rules<R>(rows: Vec<R>, rules: &[Rule<R>], tally: &mut DropTally) -> Vec<R> {
    rows.into_iter()
        .filter(|row| {
            for rule in rules {
                if (rule.rejects)(row) {
                    tally.add(rule.name);
                    return false;
                }
            }
            true
        })
        .collect()
}
