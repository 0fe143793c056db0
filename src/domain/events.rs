/// Everything a session reacts to: user traversal intents, gallery paging,
/// transition deadlines and narration playback signals.
#[derive(Debug)]
pub enum Event {
    Advance,
    Retreat,
    Recenter,
    TransitionCompleted { target_index: usize },
    PlaybackPosition(f64),
    PlaybackDuration(f64),
    PlaybackEnded,
    GalleryNext,
    GalleryPrevious,
}
