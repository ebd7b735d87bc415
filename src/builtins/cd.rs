use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;

use crate::prelude::*;

use super::{BuiltinCommand, BuiltinError};

#[derive(Debug, Clone, Default)]
pub struct Cd;

#[async_trait]
impl BuiltinCommand for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }

    async fn execute(
        &self,
        args: &[String],
        io: &mut BuiltinIo,
        ctx: &mut ShellContext,
    ) -> Result<BuiltinExitStatus, BuiltinError> {
        trace!("executing cd builtin: {args:?}");

        if args.len() > 1 {
            return Err(BuiltinError::Usage("too many arguments".into()));
        }

        let target = args.first().map(String::as_str).unwrap_or("~");

        let Some(path) = expand_home(target, ctx.home_dir()) else {
            io.stderr.write_all(b"cd: HOME not set\n").await?;
            return Ok(BuiltinExitStatus::new_failure());
        };

        trace!("cd: {:?}", path);

        // relative targets are resolved by the OS, even from a removed directory
        match std::env::set_current_dir(&path) {
            Ok(_) => Ok(BuiltinExitStatus::new_success()),
            Err(err) => {
                debug!("failed to cd: {}", err);
                let reason = describe(&path, &err);
                io.stderr
                    .write_all(format!("cd: {target}: {reason}\n").as_bytes())
                    .await?;
                Ok(BuiltinExitStatus::new_failure())
            }
        }
    }
}

/// `~` alone or as a leading `~/` component means the home directory.
fn expand_home(target: &str, home: Option<PathBuf>) -> Option<PathBuf> {
    match target {
        "~" => home,
        _ => match target.strip_prefix("~/") {
            Some(rest) => home.map(|home| home.join(rest)),
            None => Some(PathBuf::from(target)),
        },
    }
}

fn describe(path: &Path, err: &io::Error) -> String {
    if path.exists() && !path.is_dir() {
        return "Not a directory".into();
    }

    match err.kind() {
        io::ErrorKind::NotFound => "No such file or directory".into(),
        io::ErrorKind::PermissionDenied => "Permission denied".into(),
        _ => err.to_string(),
    }
}
