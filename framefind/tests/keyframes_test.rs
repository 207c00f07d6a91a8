mod common;

use common::stub_tool;
use std::path::Path;

use framefind::{
    config::FfmpegConfig, error::Error, keyframes::key_frames, seek::correct_seek,
};
use tempfile::TempDir;

fn stub_ffprobe(dir: &TempDir, script: &str) -> FfmpegConfig {
    FfmpegConfig {
        ffprobe_path: stub_tool(dir.path(), "ffprobe", script),
        ..FfmpegConfig::default()
    }
}

#[test]
fn streams_keyframes_and_skips_noise() {
    let dir = TempDir::new().unwrap();
    let cfg = stub_ffprobe(
        &dir,
        r#"printf 'some banner noise\n'
printf 'frame,0.000000\n'
printf 'frame,2.500000\n'
printf 'frame,5.000000side_data,whatever\n'
printf 'not,a,frame,line\n'
printf 'frame,8.200000\n'"#,
    );

    let times: Vec<f64> = key_frames(&cfg, Path::new("video.mkv"))
        .unwrap()
        .map(|frame| frame.unwrap().time)
        .collect();

    assert_eq!(vec![0.0, 2.5, 5.0, 8.2], times);
}

#[test]
fn nonzero_exit_surfaces_after_the_last_keyframe() {
    let dir = TempDir::new().unwrap();
    let cfg = stub_ffprobe(&dir, "printf 'frame,1.000000\\n'; exit 3");

    let mut frames = key_frames(&cfg, Path::new("video.mkv")).unwrap();

    assert_eq!(1.0, frames.next().unwrap().unwrap().time);
    match frames.next() {
        Some(Err(Error::ToolFailed { tool, status })) => {
            assert_eq!("ffprobe", tool);
            assert_eq!(Some(3), status.code());
        }
        other => panic!("expected a tool failure, got {other:?}"),
    }
}

#[test]
fn abandoning_the_scan_kills_the_probe() {
    let dir = TempDir::new().unwrap();
    let cfg = stub_ffprobe(
        &dir,
        r#"i=0
while [ $i -lt 10 ]; do
  printf "frame,$i.000000\n"
  i=$((i+1))
done
exec sleep 600"#,
    );

    let mut frames = key_frames(&cfg, Path::new("video.mkv")).unwrap();
    let pid = frames.pid();

    assert_eq!(0.0, frames.next().unwrap().unwrap().time);
    assert_eq!(1.0, frames.next().unwrap().unwrap().time);
    drop(frames);

    assert!(
        !std::path::Path::new(&format!("/proc/{pid}")).exists(),
        "the probe process is still around"
    );
}

#[test]
fn seek_correction_stops_the_probe_early() {
    let dir = TempDir::new().unwrap();
    let cfg = stub_ffprobe(
        &dir,
        r#"printf 'frame,0.000000\n'
printf 'frame,2.500000\n'
printf 'frame,5.000000\n'
printf 'frame,8.200000\n'
exec sleep 600"#,
    );

    let frames = key_frames(&cfg, Path::new("video.mkv")).unwrap();
    let pid = frames.pid();

    assert_eq!(5.0, correct_seek(6.0, frames).unwrap());
    assert!(
        !std::path::Path::new(&format!("/proc/{pid}")).exists(),
        "the probe process is still around"
    );
}
