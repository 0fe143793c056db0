use crate::domain::{Coordinate, Itinerary, RouteSegment, Waypoint};
use serde::Deserialize;

/// Wire shape of a route document as the route catalog publishes it.
#[derive(Debug, Deserialize)]
pub struct SerializedRoute {
    pub id: String,
    pub name: String,
    pub segments: Vec<SerializedSegment>,
}

#[derive(Debug, Deserialize)]
pub struct SerializedSegment {
    pub waypoints: Vec<SerializedWaypoint>,
    #[serde(default)]
    pub path: Vec<Coordinate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedWaypoint {
    pub id: String,
    pub order: u32,
    pub coordinate: Coordinate,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_refs: Vec<String>,
    pub narration_audio_ref: Option<String>,
    pub keyframes_ref: Option<String>,
}

impl SerializedRoute {
    /// Waypoints present in whatever order the document listed them; the
    /// explicit order field decides their position within each segment.
    pub fn into_itinerary(self) -> Itinerary {
        let segments = self
            .segments
            .into_iter()
            .map(|segment| {
                let mut waypoints = segment.waypoints.into_iter().map(to_waypoint).collect::<Vec<Waypoint>>();
                waypoints.sort_by_key(|waypoint| waypoint.order);

                RouteSegment {
                    waypoints,
                    path: segment.path,
                }
            })
            .collect();

        Itinerary::new(segments)
    }
}

fn to_waypoint(waypoint: SerializedWaypoint) -> Waypoint {
    Waypoint {
        id: waypoint.id,
        order: waypoint.order,
        coordinate: waypoint.coordinate,
        name: waypoint.name,
        description: waypoint.description,
        image_refs: waypoint.image_refs,
        narration_audio_ref: waypoint.narration_audio_ref,
        keyframes_ref: waypoint.keyframes_ref,
    }
}
