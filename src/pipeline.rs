use std::collections::HashMap;

use crate::error::Result;
use crate::locations::LocationRow;
use crate::movement::{self, MovementSample};
use crate::resolver;
use crate::statsbomb::{Match, MatchEvent};
use crate::weather::{WeatherProvider, WeatherSnapshot};

/// One enriched, persisted row per confirmed injury substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct InjuryRecord {
    pub key: String,
    pub match_id: u64,
    pub player_id: u64,
    pub player: String,
    pub substitution_outcome: String,
    pub minute: u32,
    pub distance_covered: Option<f64>,
    pub match_date: String,
    pub kick_off: String,
    pub home_team: String,
    pub stadium: String,
    pub city: String,
    pub temp: f64,
    pub dew: f64,
    pub humidity: f64,
    pub precip: f64,
    pub conditions: String,
}

/// The storage key: literal field values joined with underscores. Stable for
/// identical inputs, and the only uniqueness constraint the store enforces.
pub fn derive_key(match_id: u64, player_id: u64, minute: u32, match_date: &str) -> String {
    format!("{match_id}_{player_id}_{minute}_{match_date}")
}

/// End-to-end transform: filter injury substitutions, compute per-player
/// movement up to the injury, resolve the city, attach weather, key and
/// deduplicate. `fetch_events` is called once per match; any stage error
/// aborts the whole run.
pub fn run<F>(
    matches: &[Match],
    mut fetch_events: F,
    reference: &[LocationRow],
    weather: &dyn WeatherProvider,
) -> Result<Vec<InjuryRecord>>
where
    F: FnMut(u64) -> Result<Vec<MatchEvent>>,
{
    let mut rows = Vec::new();

    for m in matches {
        let events = fetch_events(m.match_id)?;
        rows.extend(injury_rows_for_match(m, &events, reference)?);
    }

    attach_weather(&mut rows, weather)?;

    let mut out = dedup(rows);
    out.sort_by(|a, b| {
        (a.match_id, a.minute, a.player_id).cmp(&(b.match_id, b.minute, b.player_id))
    });
    Ok(out)
}

/// Rows for one match, without weather. Injury events missing a player
/// identity cannot be keyed and are dropped.
fn injury_rows_for_match(
    m: &Match,
    events: &[MatchEvent],
    reference: &[LocationRow],
) -> Result<Vec<InjuryRecord>> {
    let injuries: Vec<&MatchEvent> = events
        .iter()
        .filter(|e| e.is_injury_substitution())
        .collect();
    if injuries.is_empty() {
        return Ok(Vec::new());
    }

    // Movement cutoff per player: the latest of that player's injury minutes.
    let mut cutoff_by_player: HashMap<u64, u32> = HashMap::new();
    for injury in &injuries {
        let Some(player_id) = injury.player_id else {
            continue;
        };
        let cutoff = cutoff_by_player.entry(player_id).or_insert(injury.minute);
        *cutoff = (*cutoff).max(injury.minute);
    }

    let mut distance_by_player: HashMap<u64, Option<f64>> = HashMap::new();
    for (player_id, cutoff) in &cutoff_by_player {
        let samples: Vec<MovementSample> = events
            .iter()
            .filter(|e| e.player_id == Some(*player_id) && e.minute <= *cutoff)
            .map(|e| MovementSample {
                minute: e.minute,
                location: e.location,
            })
            .collect();
        distance_by_player.insert(*player_id, movement::total_distance(&samples));
    }

    let resolved = resolver::resolve(&m.home_team, &m.stadium, reference)?;

    let mut out = Vec::with_capacity(injuries.len());
    for injury in injuries {
        let (Some(player_id), Some(player)) = (injury.player_id, injury.player.as_deref()) else {
            continue;
        };
        out.push(InjuryRecord {
            key: derive_key(m.match_id, player_id, injury.minute, &m.match_date),
            match_id: m.match_id,
            player_id,
            player: player.to_string(),
            substitution_outcome: "Injury".to_string(),
            minute: injury.minute,
            distance_covered: distance_by_player.get(&player_id).copied().flatten(),
            match_date: m.match_date.clone(),
            kick_off: m.kick_off.clone(),
            home_team: m.home_team.clone(),
            stadium: m.stadium.clone(),
            city: resolved.city.clone(),
            temp: 0.0,
            dew: 0.0,
            humidity: 0.0,
            precip: 0.0,
            conditions: String::new(),
        });
    }
    Ok(out)
}

/// One weather call per distinct (city, date, kickoff) triple; every row in
/// the group gets the same snapshot. A single failed lookup aborts the run.
fn attach_weather(rows: &mut [InjuryRecord], weather: &dyn WeatherProvider) -> Result<()> {
    let mut snapshots: HashMap<(String, String, String), WeatherSnapshot> = HashMap::new();
    for row in rows.iter() {
        let group = (
            row.city.clone(),
            row.match_date.clone(),
            row.kick_off.clone(),
        );
        if !snapshots.contains_key(&group) {
            let snapshot = weather.fetch(&row.city, &row.match_date, &row.kick_off)?;
            snapshots.insert(group, snapshot);
        }
    }

    for row in rows.iter_mut() {
        let group = (
            row.city.clone(),
            row.match_date.clone(),
            row.kick_off.clone(),
        );
        let Some(snapshot) = snapshots.get(&group) else {
            continue;
        };
        row.temp = snapshot.temp;
        row.dew = snapshot.dew;
        row.humidity = snapshot.humidity;
        row.precip = snapshot.precip;
        row.conditions = snapshot.conditions.clone();
    }
    Ok(())
}

/// Exact duplicate rows collapse to one; then rows sharing a key collapse to
/// the last occurrence, so the store's primary-key constraint always holds.
fn dedup(rows: Vec<InjuryRecord>) -> Vec<InjuryRecord> {
    let mut distinct: Vec<InjuryRecord> = Vec::with_capacity(rows.len());
    for row in rows {
        if !distinct.contains(&row) {
            distinct.push(row);
        }
    }

    let mut by_key: Vec<InjuryRecord> = Vec::with_capacity(distinct.len());
    for row in distinct {
        if let Some(at) = by_key.iter().position(|r| r.key == row.key) {
            by_key[at] = row;
        } else {
            by_key.push(row);
        }
    }
    by_key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_concatenates_literal_values() {
        assert_eq!(
            derive_key(3888701, 11342, 81, "2023-05-13"),
            "3888701_11342_81_2023-05-13"
        );
    }

    fn record(key: &str, minute: u32, conditions: &str) -> InjuryRecord {
        InjuryRecord {
            key: key.to_string(),
            match_id: 1,
            player_id: 2,
            player: "P".to_string(),
            substitution_outcome: "Injury".to_string(),
            minute,
            distance_covered: None,
            match_date: "2023-05-13".to_string(),
            kick_off: "19:30".to_string(),
            home_team: "H".to_string(),
            stadium: "S".to_string(),
            city: "C".to_string(),
            temp: 70.0,
            dew: 60.0,
            humidity: 50.0,
            precip: 0.0,
            conditions: conditions.to_string(),
        }
    }

    #[test]
    fn exact_duplicates_collapse() {
        let rows = vec![record("k", 10, "Clear"), record("k", 10, "Clear")];
        assert_eq!(dedup(rows).len(), 1);
    }

    #[test]
    fn shared_key_keeps_last_row() {
        let rows = vec![record("k", 10, "Clear"), record("k", 10, "Rain")];
        let out = dedup(rows);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].conditions, "Rain");
    }

    #[test]
    fn distinct_keys_both_survive() {
        let rows = vec![record("a", 10, "Clear"), record("b", 20, "Clear")];
        assert_eq!(dedup(rows).len(), 2);
    }
}
