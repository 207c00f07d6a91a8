use std::{
    io::{self, BufRead, BufReader, Read},
    process::{Child, ChildStderr, ChildStdout, Command, ExitStatus, Stdio},
};

/// Which pipe of the child to stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Stdout,
    Stderr,
}

enum Pipe {
    Out(ChildStdout),
    Err(ChildStderr),
}

impl Read for Pipe {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Pipe::Out(pipe) => pipe.read(buf),
            Pipe::Err(pipe) => pipe.read(buf),
        }
    }
}

/// A spawned child whose output is consumed one line at a time, as the child
/// produces them. The child lives exactly as long as this value: reaching the
/// end of the stream reaps it through [`CmdLines::finish`], dropping the
/// value before that kills and reaps it.
pub struct CmdLines {
    child: Child,
    output: BufReader<Pipe>,
    reaped: bool,
}

impl CmdLines {
    pub fn spawn(mut command: Command, source: Source) -> io::Result<Self> {
        match source {
            Source::Stdout => command.stdout(Stdio::piped()).stderr(Stdio::null()),
            Source::Stderr => command.stdout(Stdio::null()).stderr(Stdio::piped()),
        };
        command.stdin(Stdio::null());

        log::debug!("spawning: {command:?}");
        let mut child = command.spawn()?;

        let pipe = match source {
            Source::Stdout => Pipe::Out(child.stdout.take().expect("stdout was piped")),
            Source::Stderr => Pipe::Err(child.stderr.take().expect("stderr was piped")),
        };

        Ok(Self {
            child,
            output: BufReader::new(pipe),
            reaped: false,
        })
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// The next line without its terminator, or `None` once the pipe closes.
    ///
    /// A line ends at `\n` or `\r`: ffmpeg separates its in-place status
    /// updates with carriage returns only.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = Vec::new();

        loop {
            let chunk = self.output.fill_buf()?;
            if chunk.is_empty() {
                if line.is_empty() {
                    return Ok(None);
                }
                break;
            }

            match chunk.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(end) => {
                    line.extend_from_slice(&chunk[..end]);
                    self.output.consume(end + 1);
                    break;
                }
                None => {
                    let len = chunk.len();
                    line.extend_from_slice(chunk);
                    self.output.consume(len);
                }
            }
        }

        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }

    /// Waits for the child to exit. Call after `next_line` returned `None`,
    /// otherwise this blocks until the child is done on its own.
    pub fn finish(&mut self) -> io::Result<ExitStatus> {
        self.reaped = true;
        self.child.wait()
    }
}

impl Drop for CmdLines {
    fn drop(&mut self) {
        if !self.reaped {
            // The consumer stopped early, nobody reads the pipe anymore.
            self.child.kill().ok();
            self.child.wait().ok();
        }
    }
}
