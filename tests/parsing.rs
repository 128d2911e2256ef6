use std::fs;
use std::path::PathBuf;

use injury_etl::statsbomb::{EventType, SubOutcome, parse_events_json, parse_matches_json};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_match_list_fixture() {
    let raw = read_fixture("statsbomb_matches.json");
    let matches = parse_matches_json(&raw).expect("fixture should parse");
    assert_eq!(matches.len(), 3);

    assert_eq!(matches[0].match_id, 3888701);
    assert_eq!(matches[0].match_date, "2023-05-13");
    assert_eq!(matches[0].kick_off, "19:30:00.000");
    assert_eq!(matches[0].home_team, "Atlanta United");
    assert_eq!(matches[0].stadium, "Mercedes-Benz Stadium");

    // Third fixture has neither kickoff nor stadium; the match survives with
    // defaults instead of being dropped.
    assert_eq!(matches[2].kick_off, "00:00:00.000");
    assert_eq!(matches[2].stadium, "");
}

#[test]
fn parses_events_fixture() {
    let raw = read_fixture("statsbomb_events.json");
    let events = parse_events_json(&raw, 3888701).expect("fixture should parse");
    assert_eq!(events.len(), 7);
    assert!(events.iter().all(|e| e.match_id == 3888701));

    let injury = events
        .iter()
        .find(|e| e.is_injury_substitution())
        .expect("fixture contains one injury substitution");
    assert_eq!(injury.minute, 41);
    assert_eq!(injury.player_id, Some(11342));
    assert_eq!(injury.player.as_deref(), Some("Thiago Almada"));

    // The tactical substitution parses but is not an injury.
    let tactical = events
        .iter()
        .find(|e| e.player_id == Some(11350))
        .expect("tactical sub present");
    assert_eq!(tactical.event_type, EventType::Substitution);
    assert_eq!(tactical.substitution_outcome, Some(SubOutcome::Other));
    assert!(!tactical.is_injury_substitution());

    // Starting XI row has no player or location.
    let lineup = events.iter().find(|e| e.minute == 0).expect("lineup row");
    assert_eq!(lineup.event_type, EventType::Other);
    assert_eq!(lineup.player_id, None);
    assert_eq!(lineup.location, None);
}

#[test]
fn event_locations_parse_as_coordinates() {
    let raw = read_fixture("statsbomb_events.json");
    let events = parse_events_json(&raw, 3888701).expect("fixture should parse");
    let carry = events.iter().find(|e| e.minute == 25).expect("carry row");
    assert_eq!(carry.location, Some((3.0, 4.0)));
}

#[test]
fn non_array_payloads_are_input_errors() {
    assert!(parse_matches_json("{}").is_err());
    assert!(parse_events_json("\"nope\"", 1).is_err());
    assert!(parse_matches_json("not json").is_err());
}

#[test]
fn malformed_rows_are_skipped_not_fatal() {
    let raw = r#"[
        { "match_id": 1, "match_date": "2023-01-01",
          "home_team": { "home_team_name": "A" } },
        { "match_date": "2023-01-02" }
    ]"#;
    let matches = parse_matches_json(raw).expect("should parse");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].match_id, 1);
}
