use std::time::Duration;

use crate::{
    config::FfmpegConfig,
    error::{Error, Result},
    fps::video_fps,
    keyframes::key_frames,
    matcher::{MatchEvent, MatchSession, SessionConfig, SessionEvent},
    progress::ProgressSink,
    rescale::{rescale, RescaledPosition},
    seek::correct_seek,
    throttle::ReportThrottle,
};

/// Runs one full search: resolves the input frame rate, snaps the requested
/// start back to the keyframe the decoder will land on, drives the analysis
/// process and hands every surfaced match to `on_match` in input-video
/// coordinates.
///
/// `interrupted` is polled between events; once it returns true the drain
/// stops and the analysis process is killed on the way out. The sink is torn
/// down on every exit path.
pub fn run_search<C, F>(
    cfg: &FfmpegConfig,
    session: &SessionConfig,
    report_interval: Duration,
    sink: &mut dyn ProgressSink,
    mut interrupted: C,
    mut on_match: F,
) -> Result<()>
where
    C: FnMut() -> bool,
    F: FnMut(&mut dyn ProgressSink, &RescaledPosition, &MatchEvent),
{
    let result = drive(cfg, session, report_interval, sink, &mut interrupted, &mut on_match);
    sink.finish();
    result
}

fn drive<C, F>(
    cfg: &FfmpegConfig,
    session: &SessionConfig,
    report_interval: Duration,
    sink: &mut dyn ProgressSink,
    interrupted: &mut C,
    on_match: &mut F,
) -> Result<()>
where
    C: FnMut() -> bool,
    F: FnMut(&mut dyn ProgressSink, &RescaledPosition, &MatchEvent),
{
    let input_fps = video_fps(cfg, &session.video)?.ok_or(Error::NoFrameRate)?;
    let internal_fps = session.fps.map(f64::from).unwrap_or(input_fps);

    // What ffmpeg was asked to seek to is not where it will start decoding;
    // it lands on the closest earlier keyframe. All reported coordinates are
    // relative to that point.
    let start_offset = match session.start {
        None => Duration::ZERO,
        Some(start) => {
            let corrected = correct_seek(start.total_seconds(), key_frames(cfg, &session.video)?)?;
            log::debug!("requested start {start} lands on the keyframe at {corrected}s");
            Duration::from_secs_f64(corrected.max(0.0))
        }
    };

    let mut throttle = ReportThrottle::new(report_interval);
    let mut events = MatchSession::spawn(cfg, session)?;

    loop {
        if interrupted() {
            log::info!("interrupted, giving up on the rest of the video");
            return Ok(());
        }

        let Some(event) = events.next() else {
            return Ok(());
        };

        match event? {
            SessionEvent::Progress(progress) => {
                let position = rescale(
                    progress.time.to_duration(),
                    progress.frame,
                    start_offset,
                    internal_fps,
                    input_fps,
                );
                sink.render(&position);
            }
            SessionEvent::Match(found) => {
                let position = rescale(
                    Duration::from_secs_f64(found.time_secs.max(0.0)),
                    found.frame,
                    start_offset,
                    internal_fps,
                    input_fps,
                );
                if throttle.should_report(position.input_time) {
                    on_match(&mut *sink, &position, &found);
                }
            }
        }
    }
}
