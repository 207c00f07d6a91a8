use std::time::Duration;

/// A position in both coordinate systems: the full input video's, and the
/// trimmed/resampled stream's that the analysis actually ran over. Derived
/// per event, never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct RescaledPosition {
    /// Offset from the start of the original input.
    pub input_time: Duration,
    /// Frame number in the original input.
    pub input_frame: i64,
    pub internal_time: Duration,
    pub internal_frame: i64,
}

/// Maps a position the analysis process reported, relative to the sub-range
/// it was given, back onto the full input video.
///
/// `internal_fps` is the rate of the stream the process saw; pass the input
/// rate when no resampling was requested.
pub fn rescale(
    internal_time: Duration,
    internal_frame: i64,
    start_offset: Duration,
    internal_fps: f64,
    input_fps: f64,
) -> RescaledPosition {
    let frames_before_offset = start_offset.as_secs_f64() * input_fps;
    let input_frame =
        (frames_before_offset + internal_frame as f64 / internal_fps * input_fps).floor() as i64;

    RescaledPosition {
        input_time: start_offset + internal_time,
        input_frame,
        internal_time,
        internal_frame,
    }
}

/// `HH:MM:SS.ffffff`, hours as wide as they need to be.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = total % 3600 / 60;
    let seconds = total % 60;

    format!(
        "{hours:02}:{minutes:02}:{seconds:02}.{:06}",
        duration.subsec_micros()
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn offset_shifts_time_and_resampling_scales_frames() {
        let position = rescale(Duration::from_secs(2), 60, Duration::from_secs(5), 30.0, 60.0);
        assert_eq!(Duration::from_secs(7), position.input_time);
        assert_eq!(420, position.input_frame);
        assert_eq!(Duration::from_secs(2), position.internal_time);
        assert_eq!(60, position.internal_frame);
    }

    #[test]
    fn equal_rates_change_nothing() {
        let position = rescale(Duration::from_millis(1500), 45, Duration::ZERO, 30.0, 30.0);
        assert_eq!(Duration::from_millis(1500), position.input_time);
        assert_eq!(45, position.input_frame);
    }

    #[test]
    fn frame_number_rounds_down() {
        // 0.42s of offset at 25fps starts mid-frame
        let position = rescale(Duration::ZERO, 1, Duration::from_millis(420), 25.0, 25.0);
        assert_eq!(11, position.input_frame);
    }

    #[test]
    fn formatting() {
        assert_eq!("00:00:00.000000", format_duration(Duration::ZERO));
        assert_eq!("00:00:12.500000", format_duration(Duration::from_millis(12_500)));
        assert_eq!(
            "01:02:03.000004",
            format_duration(Duration::new(3723, 4_000))
        );
        assert_eq!(
            "30:00:00.000000",
            format_duration(Duration::from_secs(30 * 3600))
        );
    }
}
