use std::path::Path;

use color_eyre::{
    config::{HookBuilder, Theme},
    eyre::{self, Context},
};

pub fn init_eyre() -> eyre::Result<()> {
    let theme = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        Theme::dark()
    } else {
        Theme::new()
    };

    let (panic_hook, eyre_hook) = HookBuilder::default().theme(theme).into_hooks();
    eyre_hook
        .install()
        .wrap_err("failed to install eyre hook")?;

    std::panic::set_hook(Box::new(move |info| {
        eprintln!("{}", panic_hook.panic_report(info));
    }));

    Ok(())
}

/// Logs go to stderr so that stdout stays clean for actual output. A logfile
/// gets everything down to debug, the terminal only what was asked for.
pub fn init_logger(verbose: bool, logfile: Option<&Path>) -> eyre::Result<()> {
    let terminal_level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] [{}] [{}] {}",
                humantime::format_rfc3339_seconds(std::time::SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(
            fern::Dispatch::new()
                .level(terminal_level)
                .chain(std::io::stderr()),
        );

    if let Some(logfile) = logfile {
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .level(log::LevelFilter::Debug)
                .chain(fern::log_file(logfile).wrap_err_with(|| {
                    format!("failed to open the log file at: {logfile:?}")
                })?),
        );
    }

    dispatch.apply().wrap_err("failed to set the logger")?;

    Ok(())
}
