use std::{
    io::{self, Cursor},
    pin::Pin,
    task,
};

use tokio::{
    io::{AsyncRead, Empty, ReadBuf},
    process::ChildStdout,
};

/// Input handed to a builtin: the previous stage's output, or nothing.
pub enum StageSource {
    Pipe(ChildStdout),
    Buffer(Cursor<Vec<u8>>),
    Empty(Empty),
}

impl StageSource {
    pub fn empty() -> Self {
        Self::Empty(tokio::io::empty())
    }
}

impl From<ChildStdout> for StageSource {
    fn from(value: ChildStdout) -> Self {
        Self::Pipe(value)
    }
}

impl From<Vec<u8>> for StageSource {
    fn from(value: Vec<u8>) -> Self {
        Self::Buffer(Cursor::new(value))
    }
}

impl AsyncRead for StageSource {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> task::Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Pipe(stdout) => Pin::new(stdout).poll_read(cx, buf),
            Self::Buffer(cursor) => Pin::new(cursor).poll_read(cx, buf),
            Self::Empty(empty) => Pin::new(empty).poll_read(cx, buf),
        }
    }
}
