use async_trait::async_trait;
use itertools::Itertools;

use crate::prelude::*;

use super::{BuiltinCommand, BuiltinError};

#[derive(Debug, Clone, Default)]
pub struct Echo;

#[async_trait]
impl BuiltinCommand for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    async fn execute(
        &self,
        args: &[String],
        io: &mut BuiltinIo,
        _ctx: &mut ShellContext,
    ) -> Result<BuiltinExitStatus, BuiltinError> {
        let (newline, words) = match args.split_first() {
            Some((flag, rest)) if flag == "-n" => (false, rest),
            _ => (true, args),
        };

        let mut line = words.iter().join(" ");
        if newline {
            line.push('\n');
        }

        io.stdout.write_all(line.as_bytes()).await?;

        Ok(BuiltinExitStatus::new_success())
    }
}
