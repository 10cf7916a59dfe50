use std::collections::BTreeMap;

use anyhow::Result;
use rusqlite::Connection;

use crate::teams;

const DEFAULT_DB_PATH: &str = "data/almanac.sqlite";

pub fn connect() -> Result<Connection> {
    let path = std::env::var("ALMANAC_DB").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    if let Some(dir) = std::path::Path::new(&path).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let conn = Connection::open(&path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

/// Only the year index lives in the persistent schema. The two canonical
/// tables are created by their replace operations, so a failed run never
/// leaves an empty shell behind.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS years (
            year       INTEGER PRIMARY KEY,
            url        TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;
    Ok(())
}

// ── Year index ──

pub fn insert_years(conn: &Connection, years: &[(i32, String)]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare("INSERT OR IGNORE INTO years (year, url) VALUES (?1, ?2)")?;
        for (year, url) in years {
            count += stmt.execute(rusqlite::params![year, url])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

pub fn years_between(
    conn: &Connection,
    from: i32,
    to: i32,
    limit: Option<usize>,
) -> Result<Vec<(i32, String)>> {
    let sql = match limit {
        Some(n) => format!(
            "SELECT year, url FROM years WHERE year BETWEEN ?1 AND ?2 ORDER BY year LIMIT {}",
            n
        ),
        None => "SELECT year, url FROM years WHERE year BETWEEN ?1 AND ?2 ORDER BY year".to_string(),
    };
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params![from, to], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Canonical rows ──

#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub year: i32,
    pub event_detail: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub statistic: String,
    pub name: String,
    pub team: String,
    pub stat_value: f64,
    pub year: i32,
    pub table_name: String,
}

// ── Full-refresh sink ──

/// Drop-and-reload of `events_cleaned` in one transaction; on error the
/// previous content stays authoritative.
pub fn replace_events(conn: &Connection, rows: &[EventRow]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "
        DROP TABLE IF EXISTS events_cleaned;
        CREATE TABLE events_cleaned (
            year         INTEGER NOT NULL,
            event_detail TEXT NOT NULL
        );
        ",
    )?;
    {
        let mut stmt =
            tx.prepare("INSERT INTO events_cleaned (year, event_detail) VALUES (?1, ?2)")?;
        for r in rows {
            stmt.execute(rusqlite::params![r.year, r.event_detail])?;
        }
    }
    tx.commit()?;
    Ok(rows.len())
}

/// Drop-and-reload of `statistics_cleaned`, same all-or-nothing contract.
pub fn replace_statistics(conn: &Connection, rows: &[StatRow]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "
        DROP TABLE IF EXISTS statistics_cleaned;
        CREATE TABLE statistics_cleaned (
            \"Statistic\" TEXT NOT NULL,
            \"Name\"      TEXT NOT NULL,
            \"Team\"      TEXT NOT NULL,
            stat_value    REAL NOT NULL,
            year          INTEGER NOT NULL,
            table_name    TEXT NOT NULL
        );
        ",
    )?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO statistics_cleaned
             (\"Statistic\", \"Name\", \"Team\", stat_value, year, table_name)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for r in rows {
            stmt.execute(rusqlite::params![
                r.statistic,
                r.name,
                r.team,
                r.stat_value,
                r.year,
                r.table_name,
            ])?;
        }
    }
    tx.commit()?;
    Ok(rows.len())
}

// ── Stats command ──

pub struct SinkStats {
    pub years: usize,
    pub events: usize,
    pub event_years: usize,
    pub statistics: usize,
    pub stat_years: usize,
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: usize = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |r| r.get(0),
    )?;
    Ok(count > 0)
}

pub fn get_stats(conn: &Connection) -> Result<SinkStats> {
    let years: usize = conn.query_row("SELECT COUNT(*) FROM years", [], |r| r.get(0))?;

    let (events, event_years) = if table_exists(conn, "events_cleaned")? {
        (
            conn.query_row("SELECT COUNT(*) FROM events_cleaned", [], |r| r.get(0))?,
            conn.query_row("SELECT COUNT(DISTINCT year) FROM events_cleaned", [], |r| {
                r.get(0)
            })?,
        )
    } else {
        (0, 0)
    };

    let (statistics, stat_years) = if table_exists(conn, "statistics_cleaned")? {
        (
            conn.query_row("SELECT COUNT(*) FROM statistics_cleaned", [], |r| r.get(0))?,
            conn.query_row(
                "SELECT COUNT(DISTINCT year) FROM statistics_cleaned",
                [],
                |r| r.get(0),
            )?,
        )
    } else {
        (0, 0)
    };

    Ok(SinkStats {
        years,
        events,
        event_years,
        statistics,
        stat_years,
    })
}

/// Per-team row counts with franchise names folded through the alias map.
/// Aliasing happens at read time; the canonical table keeps source spellings.
pub fn team_rollup(conn: &Connection) -> Result<Vec<(String, i64)>> {
    if !table_exists(conn, "statistics_cleaned")? {
        return Ok(Vec::new());
    }
    let mut stmt =
        conn.prepare("SELECT \"Team\", COUNT(*) FROM statistics_cleaned GROUP BY \"Team\"")?;
    let raw = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut merged: BTreeMap<String, i64> = BTreeMap::new();
    for (team, count) in raw {
        *merged.entry(teams::canonical_team(&team).to_string()).or_default() += count;
    }
    let mut rows: Vec<(String, i64)> = merged.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(rows)
}

// ── Tests ──
