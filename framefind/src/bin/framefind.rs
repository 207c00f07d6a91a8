use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{self, Context};
use framefind::{
    config::FfmpegConfig,
    keyframes::key_frames,
    matcher::SessionConfig,
    progress::{BarSink, PlainSink, ProgressSink, SilentSink},
    rescale::format_duration,
    search::run_search,
    timespec::TimeSpec,
};
use framefind_common::bin_common::{
    init::{init_eyre, init_logger},
    termination::Interrupt,
};

#[derive(Parser, Debug)]
#[command(version)]
/// Find where a reference image appears in a video.
struct Cli {
    /// The ffmpeg binary to use
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg_path: PathBuf,

    /// The ffprobe binary to use
    #[arg(long, default_value = "ffprobe")]
    ffprobe_path: PathBuf,

    /// A file to additionally write the logs to
    #[arg(long)]
    logfile: Option<PathBuf>,

    /// Also log debug output
    #[arg(long, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the timestamp of every keyframe, one per line
    KeyFrames {
        /// The video file to probe
        video: PathBuf,
    },

    /// Search the video for frames matching the reference image
    Find(FindArgs),
}

#[derive(Args, Debug)]
struct FindArgs {
    /// Where to start searching, as seconds or HH:MM:SS[.ffffff]
    #[arg(long)]
    ss: Option<String>,

    /// Where to stop searching
    #[arg(long)]
    to: Option<String>,

    /// Crop the video before matching, like `w:h:x:y`
    #[arg(long)]
    crop: Option<String>,

    /// Crop the reference image before matching
    #[arg(long)]
    ref_crop: Option<String>,

    /// Resample the video to this frame rate before matching
    #[arg(long)]
    fps: Option<u32>,

    /// Percentage of pixels that must match
    #[arg(long, default_value_t = 98)]
    amount: u32,

    /// Per-pixel difference tolerance
    #[arg(long, default_value_t = 32)]
    threshold: u32,

    /// Least amount of video time between two reports
    #[arg(long, default_value = "0s")]
    interval: humantime::Duration,

    /// How to show progress
    #[arg(long, value_enum, default_value = "bar")]
    progress: ProgressMode,

    /// The video file to search
    video: PathBuf,

    /// The image to look for
    reference: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ProgressMode {
    Bar,
    Plain,
    None,
}

fn main() -> eyre::Result<()> {
    init_eyre()?;
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.logfile.as_deref())?;

    let cfg = FfmpegConfig {
        ffmpeg_path: cli.ffmpeg_path,
        ffprobe_path: cli.ffprobe_path,
    };

    match cli.command {
        Command::KeyFrames { video } => cmd_key_frames(&cfg, &video),
        Command::Find(args) => cmd_find(&cfg, args),
    }
}

fn cmd_key_frames(cfg: &FfmpegConfig, video: &Path) -> eyre::Result<()> {
    let frames = key_frames(cfg, video).wrap_err("failed to start ffprobe")?;
    for frame in frames {
        println!("{:.6}", frame?.time);
    }
    Ok(())
}

fn cmd_find(cfg: &FfmpegConfig, args: FindArgs) -> eyre::Result<()> {
    let parse_time = |text: &Option<String>| -> eyre::Result<Option<TimeSpec>> {
        text.as_deref()
            .map(|text| text.parse().wrap_err("not a usable time expression"))
            .transpose()
    };

    let mut session = SessionConfig::new(args.video, args.reference);
    session.start = parse_time(&args.ss)?;
    session.end = parse_time(&args.to)?;
    session.video_crop = args.crop;
    session.reference_crop = args.ref_crop;
    session.fps = args.fps;
    session.amount = args.amount;
    session.threshold = args.threshold;

    let mut sink: Box<dyn ProgressSink> = match args.progress {
        ProgressMode::Bar => Box::new(BarSink::new()),
        ProgressMode::Plain => Box::new(PlainSink),
        ProgressMode::None => Box::new(SilentSink),
    };

    let interrupt = Interrupt::install().wrap_err("failed to install signal handlers")?;

    run_search(
        cfg,
        &session,
        args.interval.into(),
        sink.as_mut(),
        || interrupt.raised(),
        |sink, position, found| {
            sink.emit_line(&format!(
                "Time {}, frame {} (internal time {}, frame {}, pblack {})",
                format_duration(position.input_time),
                position.input_frame,
                format_duration(position.internal_time),
                position.internal_frame,
                found.pblack,
            ));
        },
    )?;

    Ok(())
}
