use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{EtlError, Result};

/// One known stadium from the scraper-produced reference table. The `location`
/// column is the free-text city string the weather provider is queried with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocationRow {
    pub stadium: String,
    pub team: String,
    #[serde(rename = "location")]
    pub city: String,
}

/// Load the reference table from the CSV the external scraper writes
/// (`stadium, team, location` header). An unreadable file or an empty table
/// is fatal before any row processing starts.
pub fn load_locations(path: &Path) -> Result<Vec<LocationRow>> {
    let file = File::open(path)
        .map_err(|err| EtlError::ResolutionInput(format!("{}: {err}", path.display())))?;
    load_locations_from_reader(file)
}

pub fn load_locations_from_reader<R: Read>(reader: R) -> Result<Vec<LocationRow>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<LocationRow>() {
        let row = record.map_err(|err| EtlError::ResolutionInput(err.to_string()))?;
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(EtlError::ResolutionInput(
            "reference table has no rows".to_string(),
        ));
    }
    Ok(rows)
}
