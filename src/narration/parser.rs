use crate::domain::Keyframe;
use ordered_float::OrderedFloat;
use tracing::warn;

/// Parses a keyframes asset: one `<float-seconds>:<cumulative text>` pair per
/// line, newline-separated. A malformed line is skipped so it never fails the
/// whole load; the text after the first `:` is preserved verbatim.
pub fn parse_keyframes(raw: &str) -> Vec<Keyframe> {
    let mut keyframes = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_line)
        .collect::<Vec<Keyframe>>();

    keyframes.sort_by_key(|keyframe| OrderedFloat(keyframe.time_secs));
    keyframes
}

fn parse_line(line: &str) -> Option<Keyframe> {
    let Some((timestamp, text)) = line.split_once(':') else {
        warn!("⚠️ Skipping keyframe line without a timestamp: '{}'", line);
        return None;
    };

    match timestamp.trim().parse::<f64>() {
        Ok(time_secs) if time_secs.is_finite() && time_secs >= 0.0 => Some(Keyframe::new(time_secs, text)),
        _ => {
            warn!("⚠️ Skipping keyframe line with invalid timestamp '{}'", timestamp);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_log::test;

    #[test]
    fn parses_time_and_cumulative_text_pairs() {
        let keyframes = parse_keyframes("0.0:The\n1.5:The lighthouse\n3.2:The lighthouse appears");

        assert_eq!(
            keyframes,
            vec![
                Keyframe::new(0.0, "The"),
                Keyframe::new(1.5, "The lighthouse"),
                Keyframe::new(3.2, "The lighthouse appears"),
            ]
        );
    }

    #[test]
    fn preserves_the_text_after_the_first_colon_verbatim() {
        let keyframes = parse_keyframes("2.0: Arrival: 14:00 sharp");

        assert_eq!(keyframes, vec![Keyframe::new(2.0, " Arrival: 14:00 sharp")]);
    }

    #[test]
    fn skips_malformed_lines_and_keeps_loading() {
        let keyframes = parse_keyframes("0.0:The\nno timestamp here\nNaN:text\n-1.0:negative\n2.0:The end");

        assert_eq!(keyframes, vec![Keyframe::new(0.0, "The"), Keyframe::new(2.0, "The end")]);
    }

    #[test]
    fn sorts_keyframes_ascending_by_time() {
        let keyframes = parse_keyframes("3.0:later\n1.0:earlier");

        assert_eq!(keyframes[0].time_secs, 1.0);
        assert_eq!(keyframes[1].time_secs, 3.0);
    }

    #[test]
    fn an_empty_asset_yields_no_keyframes() {
        assert_eq!(parse_keyframes(""), vec![]);
        assert_eq!(parse_keyframes("\n  \n"), vec![]);
    }
}
