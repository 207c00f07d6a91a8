use std::{path::PathBuf, sync::OnceLock};

use framefind_common::utils::process::{CmdLines, Source};
use regex::Regex;

use crate::{
    config::FfmpegConfig,
    error::{Error, Result},
    timespec::TimeSpec,
};

/// Everything one analysis run needs to know. Immutable for the lifetime of
/// the session.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub video: PathBuf,
    pub reference: PathBuf,
    pub start: Option<TimeSpec>,
    pub end: Option<TimeSpec>,
    /// Crop filter argument for the video, like `w:h:x:y`.
    pub video_crop: Option<String>,
    /// Crop filter argument for the reference image.
    pub reference_crop: Option<String>,
    /// Resample the trimmed stream to this rate before matching.
    pub fps: Option<u32>,
    /// Percentage of pixels that must fall under the threshold for a frame
    /// to count as a match.
    pub amount: u32,
    /// Per-pixel difference under which a pixel counts as matching.
    pub threshold: u32,
}

impl SessionConfig {
    pub fn new(video: PathBuf, reference: PathBuf) -> Self {
        Self {
            video,
            reference,
            start: None,
            end: None,
            video_crop: None,
            reference_crop: None,
            fps: None,
            amount: 98,
            threshold: 32,
        }
    }
}

/// What the analysis process reports while it runs, in encounter order.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Progress(ProgressEvent),
    Match(MatchEvent),
}

/// ffmpeg's periodic status line: where the run currently is, in the
/// coordinates of the trimmed and possibly resampled stream it was given.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressEvent {
    pub time: TimeSpec,
    pub frame: i64,
}

/// One frame whose difference against the reference image fell within the
/// configured thresholds.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchEvent {
    /// Seconds into the stream the session was given.
    pub time_secs: f64,
    pub frame: i64,
    /// The matching-pixel percentage the filter reported.
    pub pblack: u32,
}

/// A running analysis over one sub-range of one video.
///
/// Single pass: the iterator owns the ffmpeg process, yields events as their
/// lines arrive, checks the exit status at the end and kills the process if
/// dropped before that. Searching again means spawning a new session.
pub struct MatchSession {
    lines: CmdLines,
}

impl MatchSession {
    pub fn spawn(cfg: &FfmpegConfig, session: &SessionConfig) -> Result<Self> {
        let mut command = cfg.ffmpeg();
        command.arg("-hide_banner");
        if let Some(start) = &session.start {
            command.arg("-ss").arg(start.to_string());
        }
        if let Some(end) = &session.end {
            command.arg("-to").arg(end.to_string());
        }
        command.arg("-i").arg(&session.video);
        command.arg("-i").arg(&session.reference);
        command.arg("-an");
        command.arg("-filter_complex").arg(filter_graph(session));
        command.args(["-f", "null", "-"]);

        Ok(Self {
            lines: CmdLines::spawn(command, Source::Stderr)?,
        })
    }

    pub fn pid(&self) -> u32 {
        self.lines.pid()
    }
}

impl Iterator for MatchSession {
    type Item = Result<SessionEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.lines.next_line() {
                Err(e) => return Some(Err(e.into())),
                Ok(None) => {
                    return match self.lines.finish() {
                        Err(e) => Some(Err(e.into())),
                        Ok(status) if status.success() => None,
                        Ok(status) => Some(Err(Error::ToolFailed {
                            tool: "ffmpeg",
                            status,
                        })),
                    }
                }
                Ok(Some(line)) => match classify_line(&line) {
                    Some(event) => return Some(Ok(event)),
                    None => log::trace!("ignoring ffmpeg line: {line:?}"),
                },
            }
        }
    }
}

/// The filter graph doing the actual comparison: difference-blend the video
/// against the looped still and let blackframe flag the frames where next to
/// nothing differs.
fn filter_graph(session: &SessionConfig) -> String {
    let mut graph = Vec::new();

    let mut main = "[0:v]";
    let mut steps = Vec::new();
    if let Some(crop) = &session.video_crop {
        steps.push(format!("crop={crop}"));
    }
    if let Some(fps) = session.fps {
        steps.push(format!("fps={fps}"));
    }
    if !steps.is_empty() {
        graph.push(format!("[0:v]{}[main]", steps.join(",")));
        main = "[main]";
    }

    let mut reference = "[1:v]";
    if let Some(crop) = &session.reference_crop {
        graph.push(format!("[1:v]crop={crop}[ref]"));
        reference = "[ref]";
    }

    graph.push(format!("{main}{reference}blend=difference[diff]"));
    graph.push(format!(
        "[diff]blackframe=amount={}:threshold={}",
        session.amount, session.threshold
    ));

    graph.join(";")
}

/// Sorts one output line into an event, or nothing for the noise in between.
/// Status lines come from ffmpeg's periodic progress output, match lines
/// from the blackframe filter.
pub fn classify_line(line: &str) -> Option<SessionEvent> {
    if line.starts_with("frame=") {
        parse_progress_line(line).map(SessionEvent::Progress)
    } else if line.starts_with("[Parsed_blackframe") {
        parse_match_line(line).map(SessionEvent::Match)
    } else {
        None
    }
}

/// `frame=  241 fps= 86 q=-0.0 size=N/A time=00:00:08.04 bitrate=N/A ...`
fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^frame=\s*(\d+)\b.*\btime=\s*(\S+)").expect("the regex is valid")
    });

    let caps = re.captures(line)?;
    Some(ProgressEvent {
        frame: caps[1].parse().ok()?,
        time: caps[2].parse().ok()?,
    })
}

/// `[Parsed_blackframe_2 @ 0x5f1c] frame:241 pblack:99 pts:247 t:8.233333
/// type:P last_keyframe:240`
fn parse_match_line(line: &str) -> Option<MatchEvent> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^\[Parsed_blackframe_\d+ @ [^\]]+\] frame:(\d+) pblack:(\d+) pts:\S+ t:(\S+)")
            .expect("the regex is valid")
    });

    let caps = re.captures(line)?;
    Some(MatchEvent {
        frame: caps[1].parse().ok()?,
        pblack: caps[2].parse().ok()?,
        time_secs: caps[3].parse().ok()?,
    })
}
