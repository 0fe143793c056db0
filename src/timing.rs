use crate::domain::{Coordinate, TransitionInfo};
use std::time::Duration;
use thiserror::Error;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// The viewport never zooms out below this level during a cinematic move.
pub const MIN_ZOOM: f64 = 5.0;

/// Upper bucket bounds in meters with the transition duration and zoom-out
/// magnitude for any distance below that bound (and at or above the previous
/// one). Distances beyond the last bound take `BEYOND_LAST_BUCKET`.
const BUCKETS: &[(f64, u64, f64)] = &[
    (400.0, 500, 0.0),
    (2_000.0, 3_200, 1.0),
    (8_000.0, 3_500, 2.0),
    (20_000.0, 4_000, 3.0),
    (40_000.0, 4_000, 4.0),
    (60_000.0, 4_500, 5.0),
    (120_000.0, 5_500, 6.0),
    (180_000.0, 6_000, 7.0),
    (250_000.0, 7_000, 8.0),
    (350_000.0, 7_000, 9.0),
    (500_000.0, 7_500, 10.0),
    (750_000.0, 7_500, 11.0),
    (1_000_000.0, 7_750, 12.0),
];

const BEYOND_LAST_BUCKET: (u64, f64) = (9_000, 12.0);

/// Haversine great-circle distance in meters. `distance_meters(a, a) == 0`.
pub fn distance_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let half_chord = (delta_lat / 2.0).sin().powi(2) + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (delta_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * half_chord.sqrt().asin()
}

/// How long a camera move spanning `distance` meters should take.
/// Monotonic non-decreasing in the distance.
pub fn duration_for(distance: f64) -> Result<Duration, TimingError> {
    validate(distance)?;
    Ok(Duration::from_millis(bucket(distance).0))
}

/// How many zoom levels to back out before panning over `distance` meters.
/// Zero for nearby hops, capped at 12 for continental jumps; the result is
/// subtracted from the current zoom and floored at [`MIN_ZOOM`].
pub fn zoom_out_delta(distance: f64) -> Result<f64, TimingError> {
    validate(distance)?;
    Ok(bucket(distance).1)
}

/// Computes the [`TransitionInfo`] for a camera move from `a` to `b`.
pub fn transition_for(a: &Coordinate, b: &Coordinate) -> TransitionInfo {
    let distance = distance_meters(a, b);
    TransitionInfo {
        distance_meters: distance,
        duration: Duration::from_millis(bucket(distance).0),
    }
}

fn bucket(distance: f64) -> (u64, f64) {
    BUCKETS
        .iter()
        .find(|(below, _, _)| distance < *below)
        .map(|(_, duration_ms, zoom_out)| (*duration_ms, *zoom_out))
        .unwrap_or(BEYOND_LAST_BUCKET)
}

fn validate(distance: f64) -> Result<(), TimingError> {
    if distance < 0.0 {
        return Err(TimingError::NegativeDistance(distance));
    }

    Ok(())
}

#[derive(Error, Debug, PartialEq)]
pub enum TimingError {
    #[error("distance must not be negative, got {0}")]
    NegativeDistance(f64),
}
