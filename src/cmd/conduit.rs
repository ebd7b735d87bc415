use std::{io, process::Stdio};

use tokio::process::ChildStdout;

use crate::process::read::StageSource;

/// The byte stream between two adjacent stages, seen from the consumer.
#[derive(Debug)]
pub enum Conduit {
    Shell,
    Pipe(ChildStdout),
    Buffer(Vec<u8>),
    Closed,
}

impl Conduit {
    /// Buffered bytes come back to be fed in after the spawn.
    pub fn into_stdio(self) -> io::Result<(Stdio, Option<Vec<u8>>)> {
        Ok(match self {
            Self::Shell => (Stdio::inherit(), None),
            Self::Pipe(stdout) => (stdout.try_into()?, None),
            Self::Buffer(buf) => (Stdio::piped(), Some(buf)),
            Self::Closed => (Stdio::null(), None),
        })
    }

    pub fn into_source(self) -> StageSource {
        match self {
            Self::Pipe(stdout) => stdout.into(),
            Self::Buffer(buf) => buf.into(),
            Self::Shell | Self::Closed => StageSource::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncReadExt;

    use super::*;

    #[tokio::test]
    async fn buffer_becomes_source() {
        let mut source = Conduit::Buffer(b"hi\n".to_vec()).into_source();
        let mut out = Vec::new();
        source.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, b"hi\n");
    }

    #[tokio::test]
    async fn shell_and_closed_are_empty_for_builtins() {
        for conduit in [Conduit::Shell, Conduit::Closed] {
            let mut out = Vec::new();
            conduit.into_source().read_to_end(&mut out).await.unwrap();
            assert!(out.is_empty());
        }
    }

    #[test]
    fn buffer_is_handed_back_for_feeding() {
        let (_, feed) = Conduit::Buffer(b"x".to_vec()).into_stdio().unwrap();
        assert_eq!(feed.as_deref(), Some(&b"x"[..]));

        let (_, feed) = Conduit::Closed.into_stdio().unwrap();
        assert!(feed.is_none());
    }
}
