use std::io;

use async_trait::async_trait;
use enum_dispatch::enum_dispatch;
use once_cell::sync::Lazy;
use strum::{EnumIter, IntoEnumIterator};
use thiserror::Error;

use crate::{
    history::HistoryError,
    process::{status::BuiltinExitStatus, BuiltinIo},
    state::ShellContext,
};

pub mod cd;
pub mod echo;
pub mod exit;
pub mod history;
pub mod pwd;
pub mod type_;

/// Names of every builtin, in registry order.
pub static BUILTIN_NAMES: Lazy<Vec<&'static str>> =
    Lazy::new(|| BuiltinCommands::iter().map(|cmd| cmd.name()).collect());

#[derive(Debug, Error)]
pub enum BuiltinError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error("{0}: numeric argument required")]
    NumericArgument(String),
    #[error("{0}")]
    Usage(String),
}

impl BuiltinError {
    pub fn status(&self) -> BuiltinExitStatus {
        match self {
            Self::NumericArgument(_) | Self::Usage(_) => BuiltinExitStatus::from_code(2),
            Self::Io(_) | Self::History(_) => BuiltinExitStatus::new_failure(),
        }
    }
}

/// A command run inside the shell process.
///
/// Implementations must only use the streams in `io`, never the process's
/// own stdio, so that they can be piped and redirected like any other stage.
#[async_trait]
#[enum_dispatch(BuiltinCommands)]
pub trait BuiltinCommand {
    fn name(&self) -> &'static str;
    async fn execute(
        &self,
        args: &[String],
        io: &mut BuiltinIo,
        ctx: &mut ShellContext,
    ) -> Result<BuiltinExitStatus, BuiltinError>;
}

#[enum_dispatch]
#[derive(Debug, Clone, EnumIter)]
pub enum BuiltinCommands {
    Cd(cd::Cd),
    Echo(echo::Echo),
    Exit(exit::Exit),
    History(history::HistoryBuiltin),
    Pwd(pwd::Pwd),
    Type(type_::Type),
}

impl BuiltinCommands {
    pub fn from_name(name: &str) -> Option<Self> {
        Self::iter().find(|cmd| cmd.name() == name)
    }
}
