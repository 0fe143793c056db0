mod engine;
mod parser;

pub use engine::{NarrationSync, NarrationText};
pub use parser::parse_keyframes;
