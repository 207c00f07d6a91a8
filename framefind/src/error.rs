use std::{io, process::ExitStatus};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("bad time syntax: {0:?}")]
    BadTimeSyntax(String),
    #[error("{tool} exited unsuccessfully: {status}")]
    ToolFailed {
        tool: &'static str,
        status: ExitStatus,
    },
    #[error("the input video has no frame rate")]
    NoFrameRate,
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
