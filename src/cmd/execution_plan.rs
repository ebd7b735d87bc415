use std::{path::PathBuf, str::FromStr};

use crate::parse::{parse_command, CommandParseError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionPlan {
    /// One or more stages joined by pipes, in pipeline order.
    Pipeline(Vec<StagePlan>),
    NoOp,
}

impl FromStr for ExecutionPlan {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_command(s)
    }
}

impl ExecutionPlan {
    pub fn stages(&self) -> &[StagePlan] {
        match self {
            Self::Pipeline(stages) => stages,
            Self::NoOp => &[],
        }
    }
}

/// One pipeline segment with its redirections already stripped out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePlan {
    pub program: String,
    pub args: Vec<String>,
    pub redirects: RedirectionPlan,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectionPlan {
    pub stdout: Option<Redirect>,
    pub stderr: Option<Redirect>,
}

impl RedirectionPlan {
    pub fn is_empty(&self) -> bool {
        self.stdout.is_none() && self.stderr.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub path: PathBuf,
    pub mode: RedirectMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    Truncate,
    Append,
}
