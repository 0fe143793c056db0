use crate::domain::Coordinate;

/// A single stop on a route. Immutable once loaded into a session.
#[derive(Clone, PartialEq, Debug)]
pub struct Waypoint {
    pub id: String,
    pub order: u32,
    pub coordinate: Coordinate,
    pub name: String,
    pub description: String,
    pub image_refs: Vec<String>,
    pub narration_audio_ref: Option<String>,
    pub keyframes_ref: Option<String>,
}

/// An ordered run of waypoints plus the raw polyline used for route-line rendering.
#[derive(Clone, PartialEq, Debug)]
pub struct RouteSegment {
    pub waypoints: Vec<Waypoint>,
    pub path: Vec<Coordinate>,
}
