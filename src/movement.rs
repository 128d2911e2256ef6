/// One per-player observation: where the player was at a given match minute.
/// Location is optional because many event kinds carry no pitch coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementSample {
    pub minute: u32,
    pub location: Option<(f64, f64)>,
}

/// Total distance covered across a player's location samples: stable sort by
/// minute, drop samples without a coordinate, sum consecutive Euclidean
/// segment lengths.
///
/// Returns `None` with fewer than two usable coordinates — zero would read as
/// "observed, no movement", which is a different claim than "not enough data".
/// Callers clip the sample window to the injury minute before calling; this
/// function does not.
pub fn total_distance(samples: &[MovementSample]) -> Option<f64> {
    let mut ordered: Vec<&MovementSample> = samples.iter().collect();
    // Stable: duplicate minutes keep their original record order.
    ordered.sort_by_key(|s| s.minute);

    let points: Vec<(f64, f64)> = ordered.iter().filter_map(|s| s.location).collect();
    if points.len() < 2 {
        return None;
    }

    let total = points
        .windows(2)
        .map(|pair| segment_length(pair[0], pair[1]))
        .sum();
    Some(total)
}

fn segment_length(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(minute: u32, location: Option<(f64, f64)>) -> MovementSample {
        MovementSample { minute, location }
    }

    #[test]
    fn sums_consecutive_segments() {
        let samples = [
            sample(10, Some((0.0, 0.0))),
            sample(25, Some((3.0, 4.0))),
            sample(40, Some((3.0, 4.0))),
        ];
        assert_eq!(total_distance(&samples), Some(5.0));
    }

    #[test]
    fn order_independent_given_distinct_minutes() {
        let shuffled = [
            sample(40, Some((3.0, 4.0))),
            sample(10, Some((0.0, 0.0))),
            sample(25, Some((3.0, 4.0))),
        ];
        assert_eq!(total_distance(&shuffled), Some(5.0));
    }

    #[test]
    fn fewer_than_two_points_is_none_not_zero() {
        assert_eq!(total_distance(&[]), None);
        assert_eq!(total_distance(&[sample(5, Some((1.0, 1.0)))]), None);
        let no_coords = [sample(1, None), sample(2, None), sample(3, None)];
        assert_eq!(total_distance(&no_coords), None);
    }

    #[test]
    fn missing_locations_are_skipped_not_zeroed() {
        let samples = [
            sample(1, Some((0.0, 0.0))),
            sample(2, None),
            sample(3, Some((6.0, 8.0))),
        ];
        assert_eq!(total_distance(&samples), Some(10.0));
    }

    #[test]
    fn duplicate_minutes_keep_record_order() {
        // Two samples at minute 2: (1,0) first, then (2,0). Stable ordering
        // walks 0,0 -> 1,0 -> 2,0 -> 3,0 for a total of 3.
        let samples = [
            sample(1, Some((0.0, 0.0))),
            sample(2, Some((1.0, 0.0))),
            sample(2, Some((2.0, 0.0))),
            sample(3, Some((3.0, 0.0))),
        ];
        assert_eq!(total_distance(&samples), Some(3.0));
    }
}
