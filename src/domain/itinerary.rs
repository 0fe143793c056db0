use crate::domain::waypoint::{RouteSegment, Waypoint};

/// The full ordered sequence of route segments for one guided session.
///
/// All waypoints across all segments share one continuous flat index space;
/// the itinerary resolves a flat index back to its segment and local position.
/// Created once per demo session and dropped when the session ends.
#[derive(Clone, PartialEq, Debug)]
pub struct Itinerary {
    segments: Vec<RouteSegment>,
    waypoint_count: usize,
}

impl Itinerary {
    pub fn new(segments: Vec<RouteSegment>) -> Self {
        let waypoint_count = segments.iter().map(|segment| segment.waypoints.len()).sum();
        Itinerary { segments, waypoint_count }
    }

    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoint_count
    }

    pub fn is_empty(&self) -> bool {
        self.waypoint_count == 0
    }

    /// The flat index of the final waypoint, if any waypoint exists.
    pub fn last_index(&self) -> Option<usize> {
        self.waypoint_count.checked_sub(1)
    }

    /// Maps a flat waypoint index back to `(segment index, local index)`.
    pub fn resolve(&self, index: usize) -> Option<(usize, usize)> {
        let mut remaining = index;
        for (segment_index, segment) in self.segments.iter().enumerate() {
            if remaining < segment.waypoints.len() {
                return Some((segment_index, remaining));
            }
            remaining -= segment.waypoints.len();
        }
        None
    }

    pub fn waypoint_at(&self, index: usize) -> Option<&Waypoint> {
        let (segment_index, local_index) = self.resolve(index)?;
        self.segments[segment_index].waypoints.get(local_index)
    }

    pub fn waypoints(&self) -> impl Iterator<Item = &Waypoint> {
        self.segments.iter().flat_map(|segment| segment.waypoints.iter())
    }
}
