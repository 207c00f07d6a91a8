use std::{path::Path, sync::OnceLock};

use framefind_common::utils::process::{CmdLines, Source};
use regex::Regex;

use crate::{
    config::FfmpegConfig,
    error::{Error, Result},
};

/// One keyframe of the video stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyFrame {
    /// Seconds from the start of the input.
    pub time: f64,
}

/// Streams the keyframe timestamps of `input`, in presentation order, as
/// ffprobe decodes them.
///
/// The returned iterator owns the ffprobe process: exhausting it checks the
/// exit status, dropping it early kills the process.
pub fn key_frames(cfg: &FfmpegConfig, input: &Path) -> Result<KeyFrames> {
    let mut command = cfg.ffprobe();
    command
        .arg("-hide_banner")
        .args(["-skip_frame", "nokey"])
        .args(["-select_streams", "v"])
        .arg("-show_frames")
        .args(["-show_entries", "frame=pkt_pts_time"])
        .args(["-of", "csv"])
        .arg(input);

    Ok(KeyFrames {
        lines: CmdLines::spawn(command, Source::Stdout)?,
    })
}

pub struct KeyFrames {
    lines: CmdLines,
}

impl KeyFrames {
    pub fn pid(&self) -> u32 {
        self.lines.pid()
    }
}

impl Iterator for KeyFrames {
    type Item = Result<KeyFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.lines.next_line() {
                Err(e) => return Some(Err(e.into())),
                Ok(None) => {
                    return match self.lines.finish() {
                        Err(e) => Some(Err(e.into())),
                        Ok(status) if status.success() => None,
                        Ok(status) => Some(Err(Error::ToolFailed {
                            tool: "ffprobe",
                            status,
                        })),
                    }
                }
                Ok(Some(line)) => match parse_frame_line(&line) {
                    Some(frame) => return Some(Ok(frame)),
                    None => log::debug!("ignoring ffprobe line: {line:?}"),
                },
            }
        }
    }
}

/// `frame,1.983000`, where a diagnostic suffix is sometimes glued straight
/// onto the timestamp field (https://trac.ffmpeg.org/ticket/7153). Anything
/// else, header noise included, is nothing.
fn parse_frame_line(line: &str) -> Option<KeyFrame> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE
        .get_or_init(|| Regex::new(r"^frame,(.+?)(side_data.+)?$").expect("the regex is valid"));

    let caps = re.captures(line)?;
    let time = caps[1].trim().parse().ok()?;
    Some(KeyFrame { time })
}
