use async_trait::async_trait;

use crate::prelude::*;

use super::{BuiltinCommand, BuiltinError};

#[derive(Debug, Clone, Default)]
pub struct Pwd;

#[async_trait]
impl BuiltinCommand for Pwd {
    fn name(&self) -> &'static str {
        "pwd"
    }

    async fn execute(
        &self,
        _args: &[String],
        io: &mut BuiltinIo,
        _ctx: &mut ShellContext,
    ) -> Result<BuiltinExitStatus, BuiltinError> {
        let cwd = std::env::current_dir()?;

        io.stdout
            .write_all(format!("{}\n", cwd.display()).as_bytes())
            .await?;

        Ok(BuiltinExitStatus::new_success())
    }
}
