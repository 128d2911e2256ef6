use std::path::Path;

use rusqlite::{Connection, TransactionBehavior, params};

use crate::error::Result;
use crate::pipeline::InjuryRecord;

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS injuries (
            key TEXT PRIMARY KEY,
            match_id INTEGER,
            player_id INTEGER,
            player TEXT,
            substitution_outcome TEXT,
            minute INTEGER,
            distance_covered REAL,
            match_date DATE,
            kick_off TIME,
            home_team TEXT,
            stadium TEXT,
            city TEXT,
            temp REAL,
            dew REAL,
            humidity REAL,
            precip REAL,
            conditions TEXT
        );

        CREATE TABLE IF NOT EXISTS etl_runs (
            run_id INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at TEXT NOT NULL,
            finished_at TEXT NOT NULL,
            rows_written INTEGER NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Append one audit row per completed run, after the snapshot commit.
pub fn record_run(
    conn: &Connection,
    started_at: &str,
    finished_at: &str,
    rows_written: usize,
) -> Result<()> {
    conn.execute(
        "INSERT INTO etl_runs(started_at, finished_at, rows_written) VALUES (?1, ?2, ?3)",
        params![started_at, finished_at, rows_written as i64],
    )?;
    Ok(())
}

/// Full-refresh replacement: delete everything, insert the current result
/// set, commit. Runs inside one IMMEDIATE transaction, which doubles as the
/// single-writer guard; any failure rolls back and the prior rows survive.
pub fn replace_all(conn: &mut Connection, records: &[InjuryRecord]) -> Result<usize> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    tx.execute("DELETE FROM injuries", [])?;
    {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO injuries (
                key, match_id, player_id, player, substitution_outcome, minute,
                distance_covered, match_date, kick_off, home_team, stadium,
                city, temp, dew, humidity, precip, conditions
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11,
                ?12, ?13, ?14, ?15, ?16, ?17
            )
            "#,
        )?;
        for rec in records {
            stmt.execute(params![
                rec.key,
                rec.match_id as i64,
                rec.player_id as i64,
                rec.player,
                rec.substitution_outcome,
                rec.minute as i64,
                rec.distance_covered,
                rec.match_date,
                rec.kick_off,
                rec.home_team,
                rec.stadium,
                rec.city,
                rec.temp,
                rec.dew,
                rec.humidity,
                rec.precip,
                rec.conditions,
            ])?;
        }
    }
    tx.commit()?;
    Ok(records.len())
}

/// Read the table back in key order. Used by the run harness to show what a
/// run actually persisted.
pub fn load_all(conn: &Connection) -> Result<Vec<InjuryRecord>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT
            key, match_id, player_id, player, substitution_outcome, minute,
            distance_covered, match_date, kick_off, home_team, stadium,
            city, temp, dew, humidity, precip, conditions
        FROM injuries
        ORDER BY key ASC
        "#,
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(InjuryRecord {
            key: row.get(0)?,
            match_id: row.get::<_, i64>(1)? as u64,
            player_id: row.get::<_, i64>(2)? as u64,
            player: row.get(3)?,
            substitution_outcome: row.get(4)?,
            minute: row.get::<_, i64>(5)? as u32,
            distance_covered: row.get(6)?,
            match_date: row.get(7)?,
            kick_off: row.get(8)?,
            home_team: row.get(9)?,
            stadium: row.get(10)?,
            city: row.get(11)?,
            temp: row.get(12)?,
            dew: row.get(13)?,
            humidity: row.get(14)?,
            precip: row.get(15)?,
            conditions: row.get(16)?,
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
