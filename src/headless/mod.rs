mod audio;
mod surface;

pub use audio::HeadlessAudio;
pub use surface::HeadlessSurface;
