use std::{io, path::PathBuf, process::Stdio};

use async_trait::async_trait;
use enum_dispatch::enum_dispatch;
use thiserror::Error;
use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
    process::{ChildStdin, Command},
    task::JoinHandle,
};

use super::{
    conduit::Conduit,
    execution_plan::{Redirect, RedirectMode, RedirectionPlan, StagePlan},
    resolve::{CommandResolver, Resolution},
};
use crate::{
    builtins::{BuiltinCommand, BuiltinCommands},
    process::{
        child::StageChild,
        status::{StageStatus, NOT_EXECUTABLE, NOT_FOUND},
        write::StageSink,
        BuiltinIo,
    },
    state::ShellContext,
};

#[derive(Debug, Error)]
pub enum StageError {
    #[error("{}: {source}", .path.display())]
    Redirect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl StageError {
    pub fn status(&self) -> i32 {
        match self {
            Self::Redirect { .. } => 1,
            Self::Spawn { source, .. } => match source.kind() {
                io::ErrorKind::PermissionDenied => NOT_EXECUTABLE,
                io::ErrorKind::NotFound => NOT_FOUND,
                _ => 1,
            },
        }
    }
}

#[derive(Debug)]
pub struct StageWiring {
    pub input: Conduit,
    pub piped: bool,
    pub redirects: RedirectionPlan,
}

pub struct Launched {
    pub child: StageChild,
    pub output: Conduit,
    pub feeder: Option<JoinHandle<()>>,
}

impl Launched {
    fn finished(status: impl Into<StageStatus>) -> Self {
        Self {
            child: StageChild::Finished(status.into()),
            output: Conduit::Closed,
            feeder: None,
        }
    }

    fn aborted(ctx: &ShellContext, err: StageError) -> Self {
        ctx.report(format!("skiff: {err}"));
        Self::finished(StageStatus::Aborted(err.status()))
    }
}

#[async_trait]
#[enum_dispatch(Stage)]
pub trait StageRunner {
    fn program(&self) -> &str;

    /// Starts the stage. Builtins have fully run and closed their output by
    /// the time this returns; external processes are left running.
    async fn launch(&self, wiring: StageWiring, ctx: &mut ShellContext) -> Launched;
}

#[enum_dispatch]
#[derive(Debug)]
pub enum Stage {
    Builtin(BuiltinStage),
    External(ExternalStage),
    Missing(MissingStage),
}

impl Stage {
    pub fn resolve(plan: &StagePlan, resolver: &CommandResolver) -> Self {
        let program = plan.program.clone();
        let args = plan.args.clone();

        match resolver.resolve(&plan.program) {
            Resolution::Builtin(builtin) => BuiltinStage { builtin, args }.into(),
            Resolution::External(path) => ExternalStage {
                program,
                path,
                args,
            }
            .into(),
            Resolution::NotFound => MissingStage { program }.into(),
        }
    }
}

#[derive(Debug)]
pub struct BuiltinStage {
    builtin: BuiltinCommands,
    args: Vec<String>,
}

#[async_trait]
impl StageRunner for BuiltinStage {
    fn program(&self) -> &str {
        self.builtin.name()
    }

    async fn launch(&self, wiring: StageWiring, ctx: &mut ShellContext) -> Launched {
        let StageWiring {
            input,
            piped,
            redirects,
        } = wiring;

        let stdout = match &redirects.stdout {
            Some(redirect) => match open_redirect(redirect).await {
                Ok(file) => file.into(),
                Err(err) => return Launched::aborted(ctx, err),
            },
            None if piped => StageSink::buffer(),
            None => StageSink::stdout(),
        };

        let stderr = match &redirects.stderr {
            Some(redirect) => match open_redirect(redirect).await {
                Ok(file) => file.into(),
                Err(err) => return Launched::aborted(ctx, err),
            },
            None => StageSink::stderr(),
        };

        let mut io = BuiltinIo {
            stdin: input.into_source(),
            stdout,
            stderr,
        };

        trace!(builtin = self.program(), args = ?self.args, "running builtin");

        let status = match self.builtin.execute(&self.args, &mut io, ctx).await {
            Ok(status) => status,
            Err(err) => {
                debug!(builtin = self.program(), %err, "builtin failed");
                let message = format!("{}: {err}\n", self.program());
                if let Err(err) = io.stderr.write_all(message.as_bytes()).await {
                    error!("failed to report builtin error: {err}");
                }
                err.status()
            }
        };

        for sink in [&mut io.stdout, &mut io.stderr] {
            if let Err(err) = sink.shutdown().await {
                warn!("failed to close builtin output: {err}");
            }
        }

        let output = io
            .stdout
            .into_buffer()
            .map(Conduit::Buffer)
            .unwrap_or(Conduit::Closed);

        Launched {
            child: StageStatus::from(status).into(),
            output,
            feeder: None,
        }
    }
}

#[derive(Debug)]
pub struct ExternalStage {
    program: String,
    path: PathBuf,
    args: Vec<String>,
}

impl ExternalStage {
    async fn spawn(&self, wiring: StageWiring) -> Result<Launched, StageError> {
        let StageWiring {
            input,
            piped,
            redirects,
        } = wiring;

        let stdout_file = match &redirects.stdout {
            Some(redirect) => Some(open_redirect(redirect).await?.into_std().await),
            None => None,
        };

        let stderr_file = match &redirects.stderr {
            Some(redirect) => Some(open_redirect(redirect).await?.into_std().await),
            None => None,
        };

        let spawn_error = |source| StageError::Spawn {
            program: self.program.clone(),
            source,
        };

        let (stdin, feed) = input.into_stdio().map_err(spawn_error)?;

        let stdout = match stdout_file {
            Some(file) => Stdio::from(file),
            None if piped => Stdio::piped(),
            None => Stdio::inherit(),
        };

        let stderr = stderr_file.map_or_else(Stdio::inherit, Stdio::from);

        let mut cmd = Command::new(&self.path);
        cmd.arg0(&self.program)
            .args(&self.args)
            .stdin(stdin)
            .stdout(stdout)
            .stderr(stderr);

        trace!("spawning command: {:?}", cmd);

        let mut child = cmd.spawn().map_err(spawn_error)?;

        // release our copies of the child's stdio
        drop(cmd);

        let output = child
            .stdout
            .take()
            .map(Conduit::Pipe)
            .unwrap_or(Conduit::Closed);

        let feeder = feed
            .zip(child.stdin.take())
            .map(|(buf, stdin)| tokio::spawn(feed_stdin(stdin, buf)));

        Ok(Launched {
            child: child.into(),
            output,
            feeder,
        })
    }
}

#[async_trait]
impl StageRunner for ExternalStage {
    fn program(&self) -> &str {
        &self.program
    }

    async fn launch(&self, wiring: StageWiring, ctx: &mut ShellContext) -> Launched {
        match self.spawn(wiring).await {
            Ok(launched) => launched,
            Err(err) => Launched::aborted(ctx, err),
        }
    }
}

#[derive(Debug)]
pub struct MissingStage {
    program: String,
}

#[async_trait]
impl StageRunner for MissingStage {
    fn program(&self) -> &str {
        &self.program
    }

    async fn launch(&self, wiring: StageWiring, ctx: &mut ShellContext) -> Launched {
        let StageWiring {
            input, redirects, ..
        } = wiring;
        drop(input);

        // targets are still created; the diagnostic follows a stderr redirection
        let mut diagnostic = StageSink::stderr();
        for (redirect, is_stderr) in [(&redirects.stdout, false), (&redirects.stderr, true)] {
            let Some(redirect) = redirect else {
                continue;
            };
            match open_redirect(redirect).await {
                Ok(file) if is_stderr => diagnostic = file.into(),
                Ok(_) => {}
                Err(err) => ctx.report(format!("skiff: {err}")),
            }
        }

        warn!(program = %self.program, "command not found");

        let message = format!("{}: command not found\n", self.program);
        if let Err(err) = diagnostic.write_all(message.as_bytes()).await {
            error!("failed to report missing command: {err}");
        }
        if let Err(err) = diagnostic.shutdown().await {
            warn!("failed to close diagnostic stream: {err}");
        }

        Launched::finished(StageStatus::NotFound)
    }
}

async fn open_redirect(redirect: &Redirect) -> Result<File, StageError> {
    let mut options = OpenOptions::new();
    options.create(true).write(true);

    match redirect.mode {
        RedirectMode::Truncate => options.truncate(true),
        RedirectMode::Append => options.append(true),
    };

    options
        .open(&redirect.path)
        .await
        .map_err(|source| StageError::Redirect {
            path: redirect.path.clone(),
            source,
        })
}

async fn feed_stdin(mut stdin: ChildStdin, buf: Vec<u8>) {
    if let Err(err) = stdin.write_all(&buf).await {
        debug!("stage stopped reading its input: {err}");
        return;
    }

    if let Err(err) = stdin.shutdown().await {
        debug!("failed to close stage input: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(program: &str) -> StagePlan {
        StagePlan {
            program: program.into(),
            args: vec![],
            redirects: RedirectionPlan::default(),
        }
    }

    #[test]
    fn resolves_each_variant() {
        let resolver = CommandResolver::from_env();

        assert!(matches!(
            Stage::resolve(&plan("echo"), &resolver),
            Stage::Builtin(_)
        ));
        assert!(matches!(
            Stage::resolve(&plan("sh"), &resolver),
            Stage::External(_)
        ));
        assert!(matches!(
            Stage::resolve(&plan("definitely-not-a-command-xyz"), &resolver),
            Stage::Missing(_)
        ));
    }

    #[tokio::test]
    async fn piped_builtin_drains_into_buffer() {
        let stage = Stage::resolve(&plan("pwd"), &CommandResolver::default());
        let launched = stage
            .launch(
                StageWiring {
                    input: Conduit::Shell,
                    piped: true,
                    redirects: RedirectionPlan::default(),
                },
                &mut ShellContext::default(),
            )
            .await;

        let Conduit::Buffer(buf) = launched.output else {
            panic!("expected buffered output");
        };
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), format!("{}\n", cwd.display()));
        assert_eq!(launched.child.wait().await.code(), 0);
    }

    #[tokio::test]
    async fn missing_stage_closes_its_output() {
        let stage = Stage::resolve(&plan("definitely-not-a-command-xyz"), &CommandResolver::default());
        assert_eq!(stage.program(), "definitely-not-a-command-xyz");

        let launched = stage
            .launch(
                StageWiring {
                    input: Conduit::Buffer(b"ignored".to_vec()),
                    piped: true,
                    redirects: RedirectionPlan::default(),
                },
                &mut ShellContext::default(),
            )
            .await;

        assert!(matches!(launched.output, Conduit::Closed));
        assert_eq!(launched.child.wait().await, StageStatus::NotFound);
    }

    #[test]
    fn spawn_error_statuses() {
        let err = StageError::Spawn {
            program: "x".into(),
            source: io::ErrorKind::PermissionDenied.into(),
        };
        assert_eq!(err.status(), NOT_EXECUTABLE);
        assert_eq!(err.to_string(), "x: permission denied");
    }
}
