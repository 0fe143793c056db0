mod controller;

pub use controller::{CameraCommand, CameraController, CameraError, CameraHandle};
