mod http;
mod loader;
mod serialized_route;
mod source;

pub use http::HttpItinerarySource;
pub use loader::FileItinerarySource;
pub use serialized_route::SerializedRoute;
pub use source::{ItineraryError, ItinerarySource};
