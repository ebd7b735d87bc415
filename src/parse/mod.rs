use thiserror::Error;

use crate::cmd::execution_plan::{ExecutionPlan, StagePlan};

use self::{redirect::resolve_redirections, token::split_pipeline, tokenize::tokenize};

pub mod redirect;
pub mod token;
pub mod tokenize;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("syntax error: pipeline stage {stage} has no command")]
    MissingCommand { stage: usize },
}

/// Turns a raw input line into an [`ExecutionPlan`].
///
/// A blank line is a [`ExecutionPlan::NoOp`]. Every other segment of the
/// pipeline must name a command.
pub fn parse_command(line: &str) -> Result<ExecutionPlan, CommandParseError> {
    let segments = split_pipeline(line);
    let single = segments.len() == 1;

    let mut stages = Vec::with_capacity(segments.len());

    for (index, segment) in segments.iter().enumerate() {
        let (argv, redirects) = resolve_redirections(tokenize(segment));
        let mut argv = argv.into_iter();

        match argv.next() {
            Some(program) => stages.push(StagePlan {
                program,
                args: argv.collect(),
                redirects,
            }),
            None if single && redirects.is_empty() => return Ok(ExecutionPlan::NoOp),
            None => return Err(CommandParseError::MissingCommand { stage: index + 1 }),
        }
    }

    Ok(ExecutionPlan::Pipeline(stages))
}
