use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;

use injury_etl::config::Config;
use injury_etl::http_client::http_client;
use injury_etl::weather::VisualCrossing;
use injury_etl::{locations, persist, pipeline, statsbomb};

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("run failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let started_at = Utc::now().to_rfc3339();
    let mut config = Config::from_env()?;
    if let Some(db) = parse_path_arg("--db") {
        config.db_path = db;
    }
    if let Some(locations) = parse_path_arg("--locations") {
        config.locations_path = locations;
    }
    if let Some(competition) = parse_id_arg("--competition") {
        config.competition_id = competition;
    }
    if let Some(season) = parse_id_arg("--season") {
        config.season_id = season;
    }

    let reference = locations::load_locations(&config.locations_path)?;
    println!(
        "Loaded {} reference rows from {}",
        reference.len(),
        config.locations_path.display()
    );

    let client = http_client()?;
    let matches = statsbomb::fetch_matches(client, config.competition_id, config.season_id)?;
    println!(
        "Fetched {} matches (competition {}, season {})",
        matches.len(),
        config.competition_id,
        config.season_id
    );

    let weather = VisualCrossing::new(client, config.weather_api_key.clone());
    let records = pipeline::run(
        &matches,
        |match_id| statsbomb::fetch_events(client, match_id),
        &reference,
        &weather,
    )?;
    println!("Transformed {} injury records", records.len());

    let mut conn = persist::open_db(&config.db_path)?;
    let written = persist::replace_all(&mut conn, &records)?;
    persist::record_run(&conn, &started_at, &Utc::now().to_rfc3339(), written)?;
    println!("Persisted {written} rows to {}", config.db_path.display());

    // Read-back sanity check, mirrored on what we just wrote.
    let stored = persist::load_all(&conn)?;
    for rec in stored.iter().take(10) {
        println!(
            "{} | {} | min {} | dist {} | {} | {:.1}F {}",
            rec.key,
            rec.player,
            rec.minute,
            rec.distance_covered
                .map(|d| format!("{d:.1}"))
                .unwrap_or_else(|| "n/a".to_string()),
            rec.city,
            rec.temp,
            rec.conditions
        );
    }

    Ok(())
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    parse_value_arg(flag).map(PathBuf::from)
}

fn parse_id_arg(flag: &str) -> Option<u32> {
    parse_value_arg(flag).and_then(|raw| raw.parse::<u32>().ok())
}

fn parse_value_arg(flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}
