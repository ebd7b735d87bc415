use std::{fmt::Display, path::PathBuf};

use crate::{cmd::resolve::CommandResolver, history::History};

/// Everything a running pipeline may read or mutate besides its streams.
///
/// The working directory is not stored here: it is the process-wide one,
/// changed by `cd` and observed by every later path resolution.
#[derive(Debug, Default)]
pub struct ShellContext {
    pub resolver: CommandResolver,
    pub history: History,
    exit_code: Option<i32>,
}

impl ShellContext {
    pub fn new(resolver: CommandResolver, history: History) -> Self {
        Self {
            resolver,
            history,
            exit_code: None,
        }
    }

    pub fn from_env() -> Self {
        Self::new(CommandResolver::from_env(), History::default())
    }

    pub fn home_dir(&self) -> Option<PathBuf> {
        std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
    }

    /// Asks the read loop to stop once the current pipeline has finished.
    pub fn request_exit(&mut self, code: i32) {
        debug!(code, "exit requested");
        self.exit_code = Some(code);
    }

    pub fn exit_requested(&self) -> Option<i32> {
        self.exit_code
    }

    /// Writes a shell diagnostic to the shell's own error stream.
    pub fn report(&self, message: impl Display) {
        warn!("{message}");
        eprintln!("{message}");
    }
}
