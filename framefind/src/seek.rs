use crate::{error::Result, keyframes::KeyFrame};

/// Snaps a requested start time back to where the decoder will actually
/// land: the closest keyframe at or before the request.
///
/// Stops reading as soon as the answer is known; the rest of the stream is
/// abandoned, which kills the probe process backing it.
pub fn correct_seek<I>(requested_secs: f64, keyframes: I) -> Result<f64>
where
    I: IntoIterator<Item = Result<KeyFrame>>,
{
    let mut candidate = 0.0;

    for frame in keyframes {
        let time = frame?.time;
        if requested_secs <= time {
            break;
        }
        candidate = time;
    }

    Ok(candidate)
}

#[cfg(test)]
mod test {
    use super::*;

    fn frames(times: &[f64]) -> Vec<Result<KeyFrame>> {
        times.iter().map(|&time| Ok(KeyFrame { time })).collect()
    }

    #[test]
    fn snaps_back_to_the_previous_keyframe() {
        let sequence = [0.0, 2.5, 5.0, 8.2];
        assert_eq!(5.0, correct_seek(6.0, frames(&sequence)).unwrap());
        assert_eq!(0.0, correct_seek(0.0, frames(&sequence)).unwrap());
        assert_eq!(0.0, correct_seek(-3.0, frames(&sequence)).unwrap());
        assert_eq!(2.5, correct_seek(2.6, frames(&sequence)).unwrap());
        assert_eq!(2.5, correct_seek(5.0, frames(&sequence)).unwrap());
    }

    #[test]
    fn exhausted_sequence_gives_the_last_keyframe() {
        assert_eq!(8.2, correct_seek(100.0, frames(&[0.0, 2.5, 5.0, 8.2])).unwrap());
        assert_eq!(0.0, correct_seek(100.0, frames(&[])).unwrap());
    }

    #[test]
    fn stops_reading_once_the_answer_is_known() {
        struct Tail<'a>(&'a mut bool);
        impl Iterator for Tail<'_> {
            type Item = Result<KeyFrame>;
            fn next(&mut self) -> Option<Self::Item> {
                *self.0 = true;
                Some(Ok(KeyFrame { time: 9000.0 }))
            }
        }

        let mut touched_tail = false;
        let head = frames(&[0.0, 7.0]);
        let corrected =
            correct_seek(3.0, head.into_iter().chain(Tail(&mut touched_tail))).unwrap();

        assert_eq!(0.0, corrected);
        assert!(!touched_tail);
    }

    #[test]
    fn stream_errors_propagate() {
        let gone = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let failing = vec![Ok(KeyFrame { time: 0.0 }), Err(gone.into())];
        assert!(correct_seek(50.0, failing).is_err());
    }
}
