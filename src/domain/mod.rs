pub mod audio;
pub mod events;
pub mod surface;
mod coordinate;
mod itinerary;
mod keyframe;
mod transition;
mod waypoint;

pub use coordinate::Coordinate;
pub use itinerary::Itinerary;
pub use keyframe::Keyframe;
pub use transition::TransitionInfo;
pub use waypoint::{RouteSegment, Waypoint};
