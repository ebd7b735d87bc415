use async_trait::async_trait;

use crate::{cmd::resolve::Resolution, prelude::*};

use super::{BuiltinCommand, BuiltinError};

#[derive(Debug, Clone, Default)]
pub struct Type;

#[async_trait]
impl BuiltinCommand for Type {
    fn name(&self) -> &'static str {
        "type"
    }

    async fn execute(
        &self,
        args: &[String],
        io: &mut BuiltinIo,
        ctx: &mut ShellContext,
    ) -> Result<BuiltinExitStatus, BuiltinError> {
        if args.is_empty() {
            return Err(BuiltinError::Usage("missing argument".into()));
        }

        let mut status = BuiltinExitStatus::new_success();

        for name in args {
            match ctx.resolver.resolve(name) {
                Resolution::Builtin(_) => {
                    io.stdout
                        .write_all(format!("{name} is a shell builtin\n").as_bytes())
                        .await?;
                }
                Resolution::External(path) => {
                    io.stdout
                        .write_all(format!("{name} is {}\n", path.display()).as_bytes())
                        .await?;
                }
                Resolution::NotFound => {
                    io.stderr
                        .write_all(format!("{name}: not found\n").as_bytes())
                        .await?;
                    status = BuiltinExitStatus::new_failure();
                }
            }
        }

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, os::unix::fs::PermissionsExt};

    use super::*;
    use crate::{cmd::resolve::CommandResolver, history::History};

    #[tokio::test]
    async fn reports_each_kind() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("tool");
        fs::write(&tool, "").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

        let mut ctx = ShellContext::new(
            CommandResolver::new(vec![dir.path().to_owned()]),
            History::default(),
        );
        let mut io = BuiltinIo::buffered();

        let args = ["echo", "tool", "nope"].map(String::from);
        let status = Type.execute(&args, &mut io, &mut ctx).await.unwrap();

        assert!(status.failure());
        assert_eq!(
            String::from_utf8(io.stdout.into_buffer().unwrap()).unwrap(),
            format!("echo is a shell builtin\ntool is {}\n", tool.display())
        );
        assert_eq!(
            String::from_utf8(io.stderr.into_buffer().unwrap()).unwrap(),
            "nope: not found\n"
        );
    }

    #[tokio::test]
    async fn requires_an_argument() {
        let err = Type
            .execute(&[], &mut BuiltinIo::buffered(), &mut ShellContext::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "missing argument");
        assert_eq!(err.status().code(), 2);
    }
}
