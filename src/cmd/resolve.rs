use std::path::{Path, PathBuf};

use itertools::Itertools;
use nix::unistd::{access, AccessFlags};

use crate::builtins::BuiltinCommands;

#[derive(Debug, Clone)]
pub enum Resolution {
    Builtin(BuiltinCommands),
    External(PathBuf),
    NotFound,
}

/// Maps command names to builtins or executables on an ordered search path.
#[derive(Debug, Clone, Default)]
pub struct CommandResolver {
    search_path: Vec<PathBuf>,
}

impl CommandResolver {
    pub fn new(search_path: Vec<PathBuf>) -> Self {
        Self { search_path }
    }

    /// Reads the search path from `PATH`.
    pub fn from_env() -> Self {
        let search_path = std::env::var_os("PATH")
            .map(|path| std::env::split_paths(&path).collect())
            .unwrap_or_default();
        Self::from_search_path(search_path)
    }

    fn from_search_path(search_path: Vec<PathBuf>) -> Self {
        let search_path = search_path
            .into_iter()
            .filter(|dir| !dir.as_os_str().is_empty())
            .collect();
        Self::new(search_path)
    }

    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    /// Builtins always shadow executables of the same name.
    pub fn resolve(&self, name: &str) -> Resolution {
        if let Some(builtin) = BuiltinCommands::from_name(name) {
            return Resolution::Builtin(builtin);
        }

        match self.find_executable(name) {
            Some(path) => Resolution::External(path),
            None => Resolution::NotFound,
        }
    }

    /// First executable named exactly `name` in search path order.
    ///
    /// A name containing `/` is taken as a path instead of being searched.
    pub fn find_executable(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }

        if name.contains('/') {
            let path = PathBuf::from(name);
            return is_executable(&path).then_some(path);
        }

        self.search_path
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable(candidate))
    }

    /// Names of every executable on the search path, sorted and unique.
    pub fn executable_names(&self) -> Vec<String> {
        self.search_path
            .iter()
            .filter_map(|dir| std::fs::read_dir(dir).ok())
            .flatten()
            .filter_map(Result::ok)
            .filter(|entry| is_executable(&entry.path()))
            .filter_map(|entry| entry.file_name().to_str().map(str::to_owned))
            .sorted()
            .dedup()
            .collect()
    }
}

pub fn is_executable(path: &Path) -> bool {
    path.is_file() && access(path, AccessFlags::X_OK).is_ok()
}

#[cfg(test)]
mod tests {
    use std::{fs, os::unix::fs::PermissionsExt};

    use super::*;

    fn touch(dir: &Path, name: &str, mode: u32) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn builtins_shadow_executables() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "echo", 0o755);

        let resolver = CommandResolver::new(vec![dir.path().to_owned()]);
        assert!(matches!(
            resolver.resolve("echo"),
            Resolution::Builtin(BuiltinCommands::Echo(_))
        ));
    }

    #[test]
    fn first_executable_match_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        touch(first.path(), "tool", 0o644);
        let expected = touch(second.path(), "tool", 0o755);
        touch(second.path(), "other", 0o755);

        let resolver =
            CommandResolver::new(vec![first.path().to_owned(), second.path().to_owned()]);

        match resolver.resolve("tool") {
            Resolution::External(path) => assert_eq!(path, expected),
            other => panic!("unexpected resolution {other:?}"),
        }
    }

    #[test]
    fn no_partial_matches_or_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "toolbox", 0o755);
        fs::create_dir(dir.path().join("tool")).unwrap();

        let resolver = CommandResolver::new(vec![dir.path().to_owned()]);
        assert!(matches!(resolver.resolve("tool"), Resolution::NotFound));
        assert!(matches!(resolver.resolve("tool.sh"), Resolution::NotFound));
    }

    #[test]
    fn slash_names_bypass_the_search_path() {
        let dir = tempfile::tempdir().unwrap();
        let script = touch(dir.path(), "run", 0o755);

        let resolver = CommandResolver::default();
        let name = script.to_str().unwrap();
        assert_eq!(resolver.find_executable(name), Some(script.clone()));
        assert_eq!(resolver.find_executable("run"), None);
    }

    #[test]
    fn empty_search_path_entries_are_ignored() {
        let resolver = CommandResolver::from_search_path(vec![PathBuf::new(), "/bin".into()]);
        assert_eq!(resolver.search_path(), &[PathBuf::from("/bin")]);
    }

    #[test]
    fn lists_executable_names() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        touch(first.path(), "b", 0o755);
        touch(first.path(), "a", 0o755);
        touch(first.path(), "data", 0o644);
        touch(second.path(), "a", 0o755);

        let resolver =
            CommandResolver::new(vec![first.path().to_owned(), second.path().to_owned()]);
        assert_eq!(resolver.executable_names(), vec!["a", "b"]);
    }
}
