use std::io::{self, Write};

use termion::{event::Key, input::TermRead, raw::IntoRawMode};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::{
    cmd::resolve::CommandResolver,
    history::{Direction, History},
};

use self::complete::{command_candidates, complete, Completion};

pub mod complete;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMessage {
    Line(String),
    Eof,
}

/// Supplies raw input lines to the shell.
///
/// On a terminal this is a small raw-mode line editor with history recall
/// and command completion. Otherwise lines are read as they come.
pub struct LineReader {
    prompt: String,
    piped: Option<BufReader<Box<dyn AsyncRead + Send + Unpin>>>,
}

impl LineReader {
    pub fn new(prompt: impl Into<String>) -> Self {
        if termion::is_tty(&io::stdin()) {
            Self {
                prompt: prompt.into(),
                piped: None,
            }
        } else {
            Self::from_reader(prompt, tokio::io::stdin())
        }
    }

    /// Reads plain lines from `input`, without editing.
    pub fn from_reader(
        prompt: impl Into<String>,
        input: impl AsyncRead + Send + Unpin + 'static,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            piped: Some(BufReader::new(Box::new(input))),
        }
    }

    pub async fn read_line(
        &mut self,
        history: &mut History,
        resolver: &CommandResolver,
    ) -> io::Result<InputMessage> {
        if let Some(input) = &mut self.piped {
            return read_plain_line(input).await;
        }

        let prompt = self.prompt.clone();
        let resolver = resolver.clone();
        let mut taken = std::mem::take(history);

        let (taken, message) = tokio::task::spawn_blocking(move || {
            let message = edit_line(&prompt, &mut taken, &resolver);
            (taken, message)
        })
        .await
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;

        *history = taken;
        message
    }
}

/// Consumes a whole line even when it is not valid UTF-8.
async fn read_plain_line(
    input: &mut (impl AsyncBufReadExt + Unpin),
) -> io::Result<InputMessage> {
    let mut buf = Vec::new();
    if input.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(InputMessage::Eof);
    }

    if buf.ends_with(b"\n") {
        buf.pop();
        if buf.ends_with(b"\r") {
            buf.pop();
        }
    }

    String::from_utf8(buf)
        .map(InputMessage::Line)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

/// Reads one line in raw mode. Cooked mode is restored on return so
/// commands run against a normal terminal.
fn edit_line(
    prompt: &str,
    history: &mut History,
    resolver: &CommandResolver,
) -> io::Result<InputMessage> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().into_raw_mode()?;

    let mut line = String::new();
    let mut candidates = None::<Vec<String>>;

    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    for key in stdin.lock().keys() {
        match key? {
            Key::Char('\n') => {
                write!(stdout, "\r\n")?;
                history.reset_cursor();
                return Ok(InputMessage::Line(line));
            }
            Key::Char('\t') => {
                let candidates = candidates.get_or_insert_with(|| command_candidates(resolver));
                match complete(&line, candidates) {
                    Completion::Insert(text) => {
                        line.push_str(&text);
                        write!(stdout, "{text}")?;
                    }
                    Completion::NoMatch => write!(stdout, "\x07")?,
                    Completion::Ambiguous(hits) => {
                        write!(stdout, "\x07\r\n{}\r\n{prompt}{line}", hits.join("  "))?
                    }
                }
            }
            Key::Char(c) => {
                line.push(c);
                write!(stdout, "{c}")?;
            }
            Key::Backspace => {
                if line.pop().is_some() {
                    write!(stdout, "\x08 \x08")?;
                }
            }
            key @ (Key::Up | Key::Down) => {
                let direction = if key == Key::Up {
                    Direction::Up
                } else {
                    Direction::Down
                };
                line = history.navigate(direction).to_owned();
                write!(stdout, "\r{}{prompt}{line}", termion::clear::CurrentLine)?;
            }
            Key::Ctrl('c') => {
                line.clear();
                history.reset_cursor();
                write!(stdout, "^C\r\n{prompt}")?;
            }
            Key::Ctrl('d') if line.is_empty() => {
                write!(stdout, "\r\n")?;
                return Ok(InputMessage::Eof);
            }
            _ => {}
        }

        stdout.flush()?;
    }

    Ok(InputMessage::Eof)
}
