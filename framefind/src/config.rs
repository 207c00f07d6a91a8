use std::{path::PathBuf, process::Command};

/// Where the external tools live. Built once at startup and passed by
/// reference into everything that spawns one.
#[derive(Clone, Debug)]
pub struct FfmpegConfig {
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".into(),
            ffprobe_path: "ffprobe".into(),
        }
    }
}

impl FfmpegConfig {
    pub fn ffmpeg(&self) -> Command {
        Command::new(&self.ffmpeg_path)
    }

    pub fn ffprobe(&self) -> Command {
        Command::new(&self.ffprobe_path)
    }
}
