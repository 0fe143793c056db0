use crate::domain::Keyframe;
use ordered_float::OrderedFloat;
use tracing::debug;

/// Keeps on-screen narration text in sync with an audio track.
///
/// The engine reacts to exactly two external signals: elapsed playback time
/// and the resolved track duration. Keyframe times are rescaled once per
/// (keyframe-set, duration) pair, never per playback tick.
#[derive(Debug)]
pub struct NarrationSync {
    trailing_silence_secs: f64,
    min_duration_factor: f64,
    keyframes: Vec<Keyframe>,
    scaled_times: Vec<f64>,
    scaled_for: Option<OrderedFloat<f64>>,
    cursor: Cursor,
}

/// What the narration display renders: the already spoken prefix plain, the
/// newly revealed suffix highlighted.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct NarrationText {
    pub spoken: String,
    pub highlighted: String,
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Cursor {
    BeforeFirst,
    At(usize),
    Ended,
}

impl NarrationSync {
    pub fn new(trailing_silence_secs: f64, min_duration_factor: f64) -> Self {
        NarrationSync {
            trailing_silence_secs,
            min_duration_factor,
            keyframes: Vec::new(),
            scaled_times: Vec::new(),
            scaled_for: None,
            cursor: Cursor::BeforeFirst,
        }
    }

    /// Replaces the keyframe set for a newly active waypoint.
    pub fn load(&mut self, keyframes: Vec<Keyframe>) {
        self.scaled_times = keyframes.iter().map(|keyframe| keyframe.time_secs).collect();
        self.keyframes = keyframes;
        self.scaled_for = None;
        self.cursor = Cursor::BeforeFirst;
    }

    pub fn clear(&mut self) {
        self.load(Vec::new());
    }

    /// Rescales the keyframe times against the resolved track duration.
    /// Returns whether a rescale happened; a duration already applied to the
    /// current keyframe set is a no-op.
    pub fn set_duration(&mut self, duration_secs: f64) -> bool {
        if self.scaled_for == Some(OrderedFloat(duration_secs)) {
            return false;
        }

        let max_raw_time = self.keyframes.last().map(|keyframe| keyframe.time_secs).unwrap_or(0.0);
        if max_raw_time > 0.0 {
            let effective = (duration_secs - self.trailing_silence_secs).max(duration_secs * self.min_duration_factor);
            let scale = effective / max_raw_time;
            self.scaled_times = self.keyframes.iter().map(|keyframe| keyframe.time_secs * scale).collect();
            debug!("💬 Rescaled {} keyframes by {:.3} against a {:.1}s track", self.keyframes.len(), scale, duration_secs);
        }

        self.scaled_for = Some(OrderedFloat(duration_secs));
        true
    }

    /// Moves the cursor to the last keyframe spoken at playback position `t`.
    pub fn position_changed(&mut self, t: f64) {
        let spoken = self.scaled_times.partition_point(|time| *time <= t);
        self.cursor = match spoken {
            0 => Cursor::BeforeFirst,
            index => Cursor::At(index - 1),
        };
    }

    /// Playback ended: show the full text with nothing highlighted.
    pub fn ended(&mut self) {
        self.cursor = Cursor::Ended;
    }

    /// The active keyframe index; one past the last keyframe after playback
    /// ended, `None` before the first keyframe is reached.
    pub fn active_index(&self) -> Option<usize> {
        match self.cursor {
            Cursor::BeforeFirst => None,
            Cursor::At(index) => Some(index),
            Cursor::Ended => Some(self.keyframes.len()),
        }
    }

    /// The text spans to render. Without keyframes (or with narration disabled
    /// upstream) the waypoint's static description is shown unmodified.
    pub fn display_text(&self, description: &str) -> NarrationText {
        if self.keyframes.is_empty() {
            return NarrationText {
                spoken: description.to_string(),
                highlighted: String::new(),
            };
        }

        match self.cursor {
            Cursor::BeforeFirst => NarrationText::default(),
            Cursor::At(index) => {
                let spoken = if index == 0 { "" } else { self.keyframes[index - 1].cumulative_text.as_str() };
                let cumulative = &self.keyframes[index].cumulative_text;
                // Cumulative text growing by prefix is an upstream assumption;
                // when it does not hold, the whole keyframe text is highlighted.
                let highlighted = cumulative.strip_prefix(spoken).unwrap_or(cumulative);

                NarrationText {
                    spoken: spoken.to_string(),
                    highlighted: highlighted.to_string(),
                }
            }
            Cursor::Ended => NarrationText {
                spoken: self.keyframes.last().map(|keyframe| keyframe.cumulative_text.clone()).unwrap_or_default(),
                highlighted: String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_log::test;

    fn engine_with_abc() -> NarrationSync {
        let mut engine = NarrationSync::new(0.8, 1.0);
        engine.load(vec![Keyframe::new(0.0, "A"), Keyframe::new(1.0, "AB"), Keyframe::new(2.0, "ABC")]);
        engine
    }

    #[test]
    fn highlights_the_newly_revealed_suffix() {
        let mut engine = engine_with_abc();

        // duration equal to the last raw keyframe time keeps the scale at 1
        assert!(engine.set_duration(2.0));
        engine.position_changed(1.5);

        assert_eq!(engine.active_index(), Some(1));
        assert_eq!(
            engine.display_text("unused"),
            NarrationText {
                spoken: "A".to_string(),
                highlighted: "B".to_string(),
            }
        );
    }

    #[test]
    fn before_the_first_keyframe_nothing_is_shown() {
        let mut engine = engine_with_abc();
        engine.position_changed(-0.5);

        assert_eq!(engine.active_index(), None);
        assert_eq!(engine.display_text("unused"), NarrationText::default());
    }

    #[test]
    fn after_playback_ends_the_full_text_renders_without_highlight() {
        let mut engine = engine_with_abc();
        engine.ended();

        assert_eq!(engine.active_index(), Some(3));
        assert_eq!(
            engine.display_text("unused"),
            NarrationText {
                spoken: "ABC".to_string(),
                highlighted: String::new(),
            }
        );
    }

    #[test]
    fn rescales_once_per_duration() {
        let mut engine = engine_with_abc();

        assert!(engine.set_duration(2.0));
        assert!(!engine.set_duration(2.0));
        assert!(engine.set_duration(4.0));
    }

    #[test]
    fn a_fresh_keyframe_set_rescales_again_for_the_same_duration() {
        let mut engine = engine_with_abc();
        assert!(engine.set_duration(2.0));

        engine.load(vec![Keyframe::new(0.0, "X"), Keyframe::new(3.0, "XY")]);
        assert!(engine.set_duration(2.0));
    }

    #[test]
    fn stretches_keyframes_to_the_effective_duration() {
        let mut engine = NarrationSync::new(0.8, 0.5);
        engine.load(vec![Keyframe::new(0.0, "A"), Keyframe::new(1.0, "AB"), Keyframe::new(2.0, "ABC")]);

        // effective = max(10 - 0.8, 10 * 0.5) = 9.2, scale = 4.6
        engine.set_duration(10.0);

        engine.position_changed(4.5);
        assert_eq!(engine.active_index(), Some(0));
        engine.position_changed(4.6);
        assert_eq!(engine.active_index(), Some(1));
        engine.position_changed(9.2);
        assert_eq!(engine.active_index(), Some(2));
    }

    #[test]
    fn degrades_to_the_whole_text_when_growth_is_not_a_prefix() {
        let mut engine = NarrationSync::new(0.8, 1.0);
        engine.load(vec![Keyframe::new(0.0, "XY"), Keyframe::new(1.0, "AB")]);

        engine.position_changed(1.0);

        assert_eq!(
            engine.display_text("unused"),
            NarrationText {
                spoken: "XY".to_string(),
                highlighted: "AB".to_string(),
            }
        );
    }

    #[test]
    fn without_keyframes_the_description_is_shown_unmodified() {
        let engine = NarrationSync::new(0.8, 1.0);

        assert_eq!(
            engine.display_text("A quiet harbor town."),
            NarrationText {
                spoken: "A quiet harbor town.".to_string(),
                highlighted: String::new(),
            }
        );
    }
}
