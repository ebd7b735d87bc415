use itertools::Itertools;

use crate::{builtins::BUILTIN_NAMES, cmd::resolve::CommandResolver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Nothing matches, or the cursor is past the command word.
    NoMatch,
    /// Text to append to the line.
    Insert(String),
    /// Several candidates and no longer common prefix.
    Ambiguous(Vec<String>),
}

/// Builtin names and executables on the search path, sorted and unique.
pub fn command_candidates(resolver: &CommandResolver) -> Vec<String> {
    BUILTIN_NAMES
        .iter()
        .map(|name| name.to_string())
        .chain(resolver.executable_names())
        .sorted()
        .dedup()
        .collect()
}

/// Completes the command word of `line` against `candidates`.
pub fn complete(line: &str, candidates: &[String]) -> Completion {
    let word = match line.rfind(' ') {
        Some(idx) if !line[..idx].trim().is_empty() => return Completion::NoMatch,
        Some(idx) => &line[idx + 1..],
        None => line,
    };

    let hits = candidates
        .iter()
        .filter(|candidate| candidate.starts_with(word))
        .collect::<Vec<_>>();

    match hits.as_slice() {
        [] => Completion::NoMatch,
        [only] => Completion::Insert(format!("{} ", &only[word.len()..])),
        [first, rest @ ..] => {
            let prefix = rest.iter().fold(first.as_str(), |prefix, hit| {
                let len = prefix
                    .char_indices()
                    .zip(hit.chars())
                    .find(|((_, a), b)| a != b)
                    .map_or(prefix.len().min(hit.len()), |((idx, _), _)| idx);
                &prefix[..len]
            });

            if prefix.len() > word.len() {
                Completion::Insert(prefix[word.len()..].to_owned())
            } else {
                Completion::Ambiguous(hits.into_iter().cloned().collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_hit_gets_trailing_space() {
        let names = candidates(&["echo", "exit", "pwd"]);
        assert_eq!(complete("ech", &names), Completion::Insert("o ".into()));
        assert_eq!(complete("  pw", &names), Completion::Insert("d ".into()));
    }

    #[test]
    fn common_prefix_is_inserted() {
        let names = candidates(&["xyz_foo", "xyz_foo_bar", "xyz_foo_bar_baz"]);
        assert_eq!(complete("xyz", &names), Completion::Insert("_foo".into()));
        assert_eq!(
            complete("xyz_foo", &names),
            Completion::Ambiguous(candidates(&["xyz_foo", "xyz_foo_bar", "xyz_foo_bar_baz"]))
        );
    }

    #[test]
    fn ambiguous_hits_are_listed() {
        let names = candidates(&["echo", "exit", "pwd"]);
        assert_eq!(
            complete("e", &names),
            Completion::Ambiguous(candidates(&["echo", "exit"]))
        );
    }

    #[test]
    fn only_the_first_word_completes() {
        let names = candidates(&["echo"]);
        assert_eq!(complete("echo ec", &names), Completion::NoMatch);
        assert_eq!(complete("zz", &names), Completion::NoMatch);
    }

    #[test]
    fn candidates_include_builtins() {
        let names = command_candidates(&CommandResolver::default());
        assert_eq!(names, candidates(&["cd", "echo", "exit", "history", "pwd", "type"]));
    }
}
