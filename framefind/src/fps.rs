use std::path::Path;

use framefind_common::utils::process::{CmdLines, Source};

use crate::{
    config::FfmpegConfig,
    error::{Error, Result},
};

/// The frame rate of the first video stream, from container metadata.
/// `None` when the input does not carry one.
pub fn video_fps(cfg: &FfmpegConfig, input: &Path) -> Result<Option<f64>> {
    let mut command = cfg.ffprobe();
    command
        .args(["-v", "error"])
        .args(["-select_streams", "v:0"])
        .args(["-show_entries", "stream=r_frame_rate"])
        .args(["-of", "csv=p=0"])
        .arg(input);

    let mut lines = CmdLines::spawn(command, Source::Stdout)?;
    let mut rate = None;
    while let Some(line) = lines.next_line()? {
        if rate.is_none() {
            rate = parse_rate(line.trim());
        }
    }

    let status = lines.finish()?;
    if !status.success() {
        return Err(Error::ToolFailed {
            tool: "ffprobe",
            status,
        });
    }
    Ok(rate)
}

/// ffprobe prints the rate as a rational, `30000/1001`, or occasionally as a
/// plain number.
fn parse_rate(field: &str) -> Option<f64> {
    let rate = match field.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.parse().ok()?;
            let denominator: f64 = denominator.parse().ok()?;
            numerator / denominator
        }
        None => field.parse().ok()?,
    };

    (rate.is_finite() && rate > 0.0).then_some(rate)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rationals() {
        assert_eq!(Some(25.0), parse_rate("25/1"));
        assert_eq!(Some(30000.0 / 1001.0), parse_rate("30000/1001"));
        assert_eq!(Some(24.0), parse_rate("24"));
    }

    #[test]
    fn missing_rates() {
        assert_eq!(None, parse_rate("0/0"));
        assert_eq!(None, parse_rate("N/A"));
        assert_eq!(None, parse_rate(""));
        assert_eq!(None, parse_rate("0/1"));
    }
}
