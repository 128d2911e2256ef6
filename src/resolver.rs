use strsim::normalized_levenshtein;

use crate::error::{EtlError, Result};
use crate::locations::LocationRow;

/// Best city match for a (home team, stadium) pair, with the winning
/// similarity score on a 0-100 scale. A low score is a data-quality signal,
/// not an error: the resolver always names a city.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCity {
    pub city: String,
    pub confidence: f64,
}

/// Fuzzy-match the home team name against reference team names and the
/// stadium name against reference stadium names, independently. The city of
/// whichever match scored higher wins; score ties go to the team match.
pub fn resolve(
    home_team: &str,
    stadium: &str,
    reference: &[LocationRow],
) -> Result<ResolvedCity> {
    if reference.is_empty() {
        return Err(EtlError::ResolutionInput(
            "reference table has no rows".to_string(),
        ));
    }

    let (team_row, team_score) = best_match(home_team, reference, |row| row.team.as_str());
    let (stadium_row, stadium_score) = best_match(stadium, reference, |row| row.stadium.as_str());

    let (row, confidence) = if team_score >= stadium_score {
        (team_row, team_score)
    } else {
        (stadium_row, stadium_score)
    };
    Ok(ResolvedCity {
        city: row.city.clone(),
        confidence,
    })
}

fn best_match<'a>(
    needle: &str,
    reference: &'a [LocationRow],
    field: fn(&LocationRow) -> &str,
) -> (&'a LocationRow, f64) {
    let mut best = &reference[0];
    let mut best_score = f64::MIN;
    for row in reference {
        let score = similarity(needle, field(row));
        if score > best_score {
            best = row;
            best_score = score;
        }
    }
    (best, best_score)
}

fn similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(&a.trim().to_lowercase(), &b.trim().to_lowercase()) * 100.0
}
