use async_trait::async_trait;

use crate::prelude::*;

use super::{BuiltinCommand, BuiltinError};

#[derive(Debug, Clone, Default)]
pub struct Exit;

#[async_trait]
impl BuiltinCommand for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    async fn execute(
        &self,
        args: &[String],
        io: &mut BuiltinIo,
        ctx: &mut ShellContext,
    ) -> Result<BuiltinExitStatus, BuiltinError> {
        let code = match args.first() {
            None => 0,
            Some(arg) => arg
                .parse::<i32>()
                .map_err(|_| BuiltinError::NumericArgument(arg.clone()))?,
        };

        io.stdout.flush().await?;
        ctx.request_exit(code);

        Ok(BuiltinExitStatus::from_code(code))
    }
}
