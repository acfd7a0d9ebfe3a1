use tracing::warn;

use crate::db::CoordinateRow;

/// Parse one placemark's raw coordinate blob into ordered vertex rows.
///
/// The blob is split on commas alone. KML writes `lon,lat,alt lon,lat,alt`,
/// so each altitude arrives glued to the next longitude as one token
/// (`"0 -72.48"`); the stray `"0 "` prefix is stripped before parsing.
/// Zero values are unset sentinels and are skipped; non-numeric tokens are
/// logged against the trail ordinal and skipped. Survivors are consumed two
/// at a time as (longitude, latitude); a dangling last value goes unused.
pub fn parse_coordinates(raw: &str, trail_id: i64) -> Vec<CoordinateRow> {
    let mut values = Vec::new();
    for token in raw.split(',') {
        let token = token.strip_prefix("0 ").unwrap_or(token);
        match token.trim().parse::<f64>() {
            Ok(v) if v == 0.0 => {}
            Ok(v) if !v.is_finite() => {
                warn!("Non-finite coordinate token {:?} in placemark {}", token, trail_id);
            }
            Ok(v) => values.push(v),
            Err(_) => {
                warn!("Invalid coordinate token {:?} in placemark {}", token, trail_id);
            }
        }
    }

    values
        .chunks_exact(2)
        .map(|pair| CoordinateRow {
            trail_id,
            longitude: pair[0],
            latitude: pair[1],
        })
        .collect()
}

// ── Tests ──
