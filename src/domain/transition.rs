use std::time::Duration;

/// Computed once per camera move and reported to callers before any motion
/// starts, so UI timing can be aligned with the exact transition duration.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TransitionInfo {
    pub distance_meters: f64,
    pub duration: Duration,
}

impl TransitionInfo {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1_000.0
    }
}
