use std::path::Path;

use async_trait::async_trait;
use itertools::Itertools;

use crate::prelude::*;

use super::{BuiltinCommand, BuiltinError};

/// `history [n]`, `history -r|-w|-a <file>`.
#[derive(Debug, Clone, Default)]
pub struct HistoryBuiltin;

#[async_trait]
impl BuiltinCommand for HistoryBuiltin {
    fn name(&self) -> &'static str {
        "history"
    }

    async fn execute(
        &self,
        args: &[String],
        io: &mut BuiltinIo,
        ctx: &mut ShellContext,
    ) -> Result<BuiltinExitStatus, BuiltinError> {
        let history = &mut ctx.history;

        match args {
            [flag, path] if flag == "-r" => {
                history.load(Path::new(path))?;
            }
            [flag, path] if flag == "-w" => {
                history.save(Path::new(path))?;
            }
            [flag, path] if flag == "-a" => {
                history.append_to(Path::new(path))?;
            }
            [] | [_] => {
                let limit = match args.first() {
                    Some(n) => Some(n.parse::<usize>().map_err(|_| {
                        BuiltinError::NumericArgument(n.clone())
                    })?),
                    None => None,
                };

                let listing = history
                    .last(limit)
                    .map(|(idx, line)| format!("{idx:>4}  {line}\n"))
                    .join("");
                io.stdout.write_all(listing.as_bytes()).await?;
            }
            _ => {
                return Err(BuiltinError::Usage(
                    "usage: history [n] | history -r|-w|-a <file>".into(),
                ))
            }
        }

        Ok(BuiltinExitStatus::new_success())
    }
}
