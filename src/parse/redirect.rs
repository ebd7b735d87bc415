use std::path::PathBuf;

use crate::cmd::execution_plan::{Redirect, RedirectMode, RedirectionPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

fn operator(token: &str) -> Option<(Stream, RedirectMode)> {
    match token {
        ">" | "1>" => Some((Stream::Stdout, RedirectMode::Truncate)),
        ">>" | "1>>" => Some((Stream::Stdout, RedirectMode::Append)),
        "2>" => Some((Stream::Stderr, RedirectMode::Truncate)),
        "2>>" => Some((Stream::Stderr, RedirectMode::Append)),
        _ => None,
    }
}

/// Strips redirection operators and their targets out of a word list.
///
/// Operators only match as whole words. The last redirection of a stream
/// wins; an operator with no target leaves that stream unredirected.
pub fn resolve_redirections(words: Vec<String>) -> (Vec<String>, RedirectionPlan) {
    let mut plan = RedirectionPlan::default();
    let mut remaining = Vec::with_capacity(words.len());

    let mut words = words.into_iter();

    while let Some(word) = words.next() {
        let Some((stream, mode)) = operator(&word) else {
            remaining.push(word);
            continue;
        };

        let redirect = match words.next() {
            Some(target) => Some(Redirect {
                path: PathBuf::from(target),
                mode,
            }),
            None => {
                debug!(operator = %word, "redirection without a target");
                None
            }
        };

        match stream {
            Stream::Stdout => plan.stdout = redirect,
            Stream::Stderr => plan.stderr = redirect,
        }
    }

    (remaining, plan)
}
