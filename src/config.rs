use std::path::PathBuf;

use anyhow::{Context, Result};

// MLS 2023 in the StatsBomb open-data numbering.
const DEFAULT_COMPETITION_ID: u32 = 44;
const DEFAULT_SEASON_ID: u32 = 107;

/// Explicit run configuration. Built once at startup and passed down; no
/// component reads environment variables on its own.
#[derive(Debug, Clone)]
pub struct Config {
    pub competition_id: u32,
    pub season_id: u32,
    pub locations_path: PathBuf,
    pub db_path: PathBuf,
    pub weather_api_key: String,
}

impl Config {
    /// Read configuration from the process environment. The binary loads
    /// `.env` / `.env.local` beforehand; the weather key is the only value
    /// without a default.
    pub fn from_env() -> Result<Self> {
        let competition_id = parse_id_env("INJURY_COMPETITION_ID", DEFAULT_COMPETITION_ID);
        let season_id = parse_id_env("INJURY_SEASON_ID", DEFAULT_SEASON_ID);
        let locations_path = path_env("INJURY_LOCATIONS_CSV", "locations.csv");
        let db_path = path_env("INJURY_DB_PATH", "injuries.sqlite");
        let weather_api_key = std::env::var("VISUAL_CROSSING_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .context("VISUAL_CROSSING_API_KEY is not set")?;

        Ok(Self {
            competition_id,
            season_id,
            locations_path,
            db_path,
            weather_api_key,
        })
    }
}

fn parse_id_env(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<u32>().ok())
        .filter(|id| *id != 0)
        .unwrap_or(default)
}

fn path_env(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .ok()
        .filter(|val| !val.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
