use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use itertools::Itertools;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HistoryError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_owned(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// The recall cursor ranges over `0..=len`; `len` is a fresh empty line.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<String>,
    cursor: usize,
    /// Entries before this index are already in the history file.
    persisted: usize,
}

impl History {
    pub fn add(&mut self, line: &str) -> bool {
        let line = line.trim();
        let added = !line.is_empty();
        if added {
            self.entries.push(line.to_owned());
        }
        self.reset_cursor();
        added
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The newest `n` entries (all when `None`) with their 1-based numbers.
    pub fn last(&self, n: Option<usize>) -> impl Iterator<Item = (usize, &str)> + '_ {
        let start = n.map_or(0, |n| self.entries.len().saturating_sub(n));
        self.entries
            .iter()
            .enumerate()
            .skip(start)
            .map(|(idx, line)| (idx + 1, line.as_str()))
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = self.entries.len();
    }

    pub fn navigate(&mut self, direction: Direction) -> &str {
        match direction {
            Direction::Up => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            Direction::Down => {
                self.cursor = usize::min(self.cursor + 1, self.entries.len());
            }
        }

        self.entries
            .get(self.cursor)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn load(&mut self, path: &Path) -> Result<usize, HistoryError> {
        let content = fs::read_to_string(path).map_err(HistoryError::io(path))?;

        let before = self.entries.len();
        self.entries.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_owned),
        );

        self.persisted = self.entries.len();
        self.reset_cursor();

        trace!(path = %path.display(), read = self.entries.len() - before, "loaded history");
        Ok(self.entries.len() - before)
    }

    pub fn save(&mut self, path: &Path) -> Result<(), HistoryError> {
        let data = self.entries.iter().map(|line| format!("{line}\n")).join("");
        fs::write(path, data).map_err(HistoryError::io(path))?;
        self.persisted = self.entries.len();
        Ok(())
    }

    /// Appends the entries not yet written to `path`. Returns how many were written.
    pub fn append_to(&mut self, path: &Path) -> Result<usize, HistoryError> {
        let pending = &self.entries[self.persisted.min(self.entries.len())..];
        if pending.is_empty() {
            return Ok(0);
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(HistoryError::io(path))?;

        for line in pending {
            writeln!(file, "{line}").map_err(HistoryError::io(path))?;
        }

        let written = pending.len();
        self.persisted = self.entries.len();
        Ok(written)
    }
}
