use anyhow::{Context, anyhow};
use reqwest::blocking::Client;

use crate::error::{EtlError, Result};

const TIMELINE_BASE: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";

/// Conditions at one city and kickoff time, in US units (the provider is
/// queried with `unitGroup=us`).
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub temp: f64,
    pub dew: f64,
    pub humidity: f64,
    pub precip: f64,
    pub conditions: String,
}

/// Seam between the pipeline and the weather source, so tests and offline
/// runs can swap in a canned provider.
pub trait WeatherProvider {
    fn fetch(&self, city: &str, match_date: &str, kick_off: &str) -> Result<WeatherSnapshot>;
}

/// Live Visual Crossing timeline client. One request per distinct
/// (city, kickoff) pair; no caching across calls.
pub struct VisualCrossing<'a> {
    client: &'a Client,
    api_key: String,
}

impl<'a> VisualCrossing<'a> {
    pub fn new(client: &'a Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }
}

impl WeatherProvider for VisualCrossing<'_> {
    fn fetch(&self, city: &str, match_date: &str, kick_off: &str) -> Result<WeatherSnapshot> {
        let when = combined_datetime(match_date, kick_off);
        let url = format!(
            "{TIMELINE_BASE}/{}/{when}?key={}&contentType=csv&unitGroup=us&include=current",
            strip_whitespace(city),
            self.api_key
        );

        let fetch = || -> anyhow::Result<WeatherSnapshot> {
            let resp = self.client.get(&url).send().context("request failed")?;
            let status = resp.status();
            let body = resp.text().context("failed reading body")?;
            if !status.is_success() {
                return Err(anyhow!("http {status} from weather provider"));
            }
            parse_weather_csv(&body)
        };
        fetch().map_err(|source| EtlError::WeatherFetch {
            city: city.to_string(),
            when,
            source,
        })
    }
}

/// The provider's combined date-time path segment: date, literal `T`, kickoff
/// with any whitespace removed.
pub fn combined_datetime(match_date: &str, kick_off: &str) -> String {
    format!("{match_date}T{}", strip_whitespace(kick_off))
}

fn strip_whitespace(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Extract the current-conditions columns from the provider's tabular payload.
/// Any missing column or empty payload is malformed.
pub fn parse_weather_csv(raw: &str) -> anyhow::Result<WeatherSnapshot> {
    let mut reader = csv::Reader::from_reader(raw.as_bytes());
    let headers = reader.headers().context("weather payload has no header")?.clone();

    let column = |name: &str| -> anyhow::Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow!("weather payload missing column {name}"))
    };
    let temp_at = column("temp")?;
    let dew_at = column("dew")?;
    let humidity_at = column("humidity")?;
    let precip_at = column("precip")?;
    let conditions_at = column("conditions")?;

    let record = reader
        .records()
        .next()
        .ok_or_else(|| anyhow!("weather payload has no data rows"))?
        .context("weather payload row unreadable")?;

    let number = |at: usize, name: &str| -> anyhow::Result<f64> {
        record
            .get(at)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .ok_or_else(|| anyhow!("weather column {name} is not numeric"))
    };

    Ok(WeatherSnapshot {
        temp: number(temp_at, "temp")?,
        dew: number(dew_at, "dew")?,
        humidity: number(humidity_at, "humidity")?,
        // The provider reports a blank precip cell as zero rain in practice,
        // but blank is still malformed under contentType=csv; keep it strict.
        precip: number(precip_at, "precip")?,
        conditions: record
            .get(conditions_at)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timeline_csv_payload() {
        let raw = "name,datetime,temp,feelslike,dew,humidity,precip,conditions\n\
                   \"Atlanta, GA\",2023-05-13T19:30:00,78.2,79.0,61.4,56.1,0.0,\"Partially cloudy\"\n";
        let snapshot = parse_weather_csv(raw).expect("payload should parse");
        assert_eq!(snapshot.temp, 78.2);
        assert_eq!(snapshot.dew, 61.4);
        assert_eq!(snapshot.humidity, 56.1);
        assert_eq!(snapshot.precip, 0.0);
        assert_eq!(snapshot.conditions, "Partially cloudy");
    }

    #[test]
    fn missing_column_is_malformed() {
        let raw = "name,datetime,temp\nAtlanta,2023-05-13,78.2\n";
        assert!(parse_weather_csv(raw).is_err());
    }

    #[test]
    fn header_only_payload_is_malformed() {
        let raw = "name,datetime,temp,dew,humidity,precip,conditions\n";
        assert!(parse_weather_csv(raw).is_err());
    }

    #[test]
    fn datetime_segment_strips_kickoff_whitespace() {
        assert_eq!(
            combined_datetime("2023-05-13", "19:30:00.000 "),
            "2023-05-13T19:30:00.000"
        );
    }
}
