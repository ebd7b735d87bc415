use std::{io, pin::Pin, task};

use tokio::{
    fs::File,
    io::{AsyncWrite, Stderr, Stdout},
};

/// Output handed to a builtin. The orchestrator picks the variant per stage;
/// builtins only ever see this type.
pub enum StageSink {
    Stdout(Stdout),
    Stderr(Stderr),
    File(File),
    /// Collected in memory and handed to the next stage once the builtin returns.
    Buffer(Vec<u8>),
}

impl StageSink {
    pub fn stdout() -> Self {
        Self::Stdout(tokio::io::stdout())
    }

    pub fn stderr() -> Self {
        Self::Stderr(tokio::io::stderr())
    }

    pub fn buffer() -> Self {
        Self::Buffer(Vec::new())
    }

    pub fn into_buffer(self) -> Option<Vec<u8>> {
        match self {
            Self::Buffer(buf) => Some(buf),
            _ => None,
        }
    }
}

impl From<File> for StageSink {
    fn from(value: File) -> Self {
        Self::File(value)
    }
}

impl AsyncWrite for StageSink {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
        buf: &[u8],
    ) -> task::Poll<Result<usize, io::Error>> {
        match self.get_mut() {
            Self::Stdout(stdout) => Pin::new(stdout).poll_write(cx, buf),
            Self::Stderr(stderr) => Pin::new(stderr).poll_write(cx, buf),
            Self::File(file) => Pin::new(file).poll_write(cx, buf),
            Self::Buffer(vec) => Pin::new(vec).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> task::Poll<Result<(), io::Error>> {
        match self.get_mut() {
            Self::Stdout(stdout) => Pin::new(stdout).poll_flush(cx),
            Self::Stderr(stderr) => Pin::new(stderr).poll_flush(cx),
            Self::File(file) => Pin::new(file).poll_flush(cx),
            Self::Buffer(vec) => Pin::new(vec).poll_flush(cx),
        }
    }

    fn poll_shutdown(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
    ) -> task::Poll<Result<(), io::Error>> {
        match self.get_mut() {
            // never close the shell's own streams
            Self::Stdout(stdout) => Pin::new(stdout).poll_flush(cx),
            Self::Stderr(stderr) => Pin::new(stderr).poll_flush(cx),
            Self::File(file) => Pin::new(file).poll_shutdown(cx),
            Self::Buffer(vec) => Pin::new(vec).poll_shutdown(cx),
        }
    }
}
