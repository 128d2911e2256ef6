use anyhow::{Context, anyhow};
use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::{EtlError, Result};

const OPEN_DATA_BASE: &str = "https://raw.githubusercontent.com/statsbomb/open-data/master/data";

/// One fixture from the season match list. Only the fields the pipeline joins
/// on are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub match_id: u64,
    pub match_date: String,
    pub kick_off: String,
    pub home_team: String,
    pub stadium: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Substitution,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubOutcome {
    Injury,
    Other,
}

/// One in-game event. Everything but substitutions is only interesting for
/// its minute and pitch location.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchEvent {
    pub match_id: u64,
    pub player_id: Option<u64>,
    pub player: Option<String>,
    pub event_type: EventType,
    pub substitution_outcome: Option<SubOutcome>,
    pub minute: u32,
    pub location: Option<(f64, f64)>,
}

impl MatchEvent {
    pub fn is_injury_substitution(&self) -> bool {
        self.event_type == EventType::Substitution
            && self.substitution_outcome == Some(SubOutcome::Injury)
    }
}

pub fn fetch_matches(client: &Client, competition_id: u32, season_id: u32) -> Result<Vec<Match>> {
    let url = format!("{OPEN_DATA_BASE}/matches/{competition_id}/{season_id}.json");
    let body = fetch_body(client, &url)?;
    parse_matches_json(&body)
}

pub fn fetch_events(client: &Client, match_id: u64) -> Result<Vec<MatchEvent>> {
    let url = format!("{OPEN_DATA_BASE}/events/{match_id}.json");
    let body = fetch_body(client, &url)?;
    parse_events_json(&body, match_id)
}

fn fetch_body(client: &Client, url: &str) -> Result<String> {
    let fetch = || -> anyhow::Result<String> {
        let resp = client.get(url).send().context("request failed")?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {status} from {url}"));
        }
        Ok(body)
    };
    fetch().map_err(EtlError::InputFetch)
}

pub fn parse_matches_json(raw: &str) -> Result<Vec<Match>> {
    let root: Value = serde_json::from_str(raw.trim())
        .context("invalid match list json")
        .map_err(EtlError::InputFetch)?;
    let rows = root
        .as_array()
        .ok_or_else(|| EtlError::InputFetch(anyhow!("match list is not a json array")))?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(m) = parse_match(row) {
            out.push(m);
        }
    }
    Ok(out)
}

fn parse_match(v: &Value) -> Option<Match> {
    let match_id = v.get("match_id")?.as_u64()?;
    let match_date = v.get("match_date")?.as_str()?.to_string();
    let home_team = v
        .get("home_team")
        .and_then(|t| t.get("home_team_name"))
        .and_then(|x| x.as_str())?
        .to_string();
    // Kickoff and stadium are occasionally absent in the open data; keep the
    // match rather than dropping the fixture.
    let kick_off = v
        .get("kick_off")
        .and_then(|x| x.as_str())
        .unwrap_or("00:00:00.000")
        .to_string();
    let stadium = v
        .get("stadium")
        .and_then(|s| s.get("name"))
        .and_then(|x| x.as_str())
        .unwrap_or_default()
        .to_string();

    Some(Match {
        match_id,
        match_date,
        kick_off,
        home_team,
        stadium,
    })
}

pub fn parse_events_json(raw: &str, match_id: u64) -> Result<Vec<MatchEvent>> {
    let root: Value = serde_json::from_str(raw.trim())
        .context("invalid events json")
        .map_err(EtlError::InputFetch)?;
    let rows = root
        .as_array()
        .ok_or_else(|| EtlError::InputFetch(anyhow!("events payload is not a json array")))?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(event) = parse_event(row, match_id) {
            out.push(event);
        }
    }
    Ok(out)
}

fn parse_event(v: &Value, match_id: u64) -> Option<MatchEvent> {
    let minute = u32::try_from(v.get("minute")?.as_u64()?).ok()?;
    let type_name = v
        .get("type")
        .and_then(|t| t.get("name"))
        .and_then(|x| x.as_str())
        .unwrap_or_default();
    let event_type = if type_name == "Substitution" {
        EventType::Substitution
    } else {
        EventType::Other
    };

    let substitution_outcome = v
        .get("substitution")
        .and_then(|s| s.get("outcome"))
        .and_then(|o| o.get("name"))
        .and_then(|x| x.as_str())
        .map(|name| {
            if name == "Injury" {
                SubOutcome::Injury
            } else {
                SubOutcome::Other
            }
        });

    let player_id = v.get("player").and_then(|p| p.get("id")).and_then(Value::as_u64);
    let player = v
        .get("player")
        .and_then(|p| p.get("name"))
        .and_then(|x| x.as_str())
        .map(|s| s.to_string());
    let location = parse_location(v.get("location"));

    Some(MatchEvent {
        match_id,
        player_id,
        player,
        event_type,
        substitution_outcome,
        minute,
        location,
    })
}

fn parse_location(v: Option<&Value>) -> Option<(f64, f64)> {
    let coords = v?.as_array()?;
    let x = coords.first()?.as_f64()?;
    let y = coords.get(1)?.as_f64()?;
    Some((x, y))
}
