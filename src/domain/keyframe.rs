/// A narration keyframe: at `time_secs` into the audio track, `cumulative_text`
/// has been spoken. Keyframe lists are sorted ascending by time; cumulative
/// text growing by prefix is an upstream assumption, not an enforced invariant.
#[derive(Clone, PartialEq, Debug)]
pub struct Keyframe {
    pub time_secs: f64,
    pub cumulative_text: String,
}

impl Keyframe {
    pub fn new(time_secs: f64, cumulative_text: impl Into<String>) -> Self {
        Keyframe {
            time_secs,
            cumulative_text: cumulative_text.into(),
        }
    }
}
