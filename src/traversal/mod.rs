mod controller;

pub use controller::{TraversalController, TraversalState};
