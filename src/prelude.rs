pub use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub use crate::{
    process::{
        read::StageSource,
        status::{BuiltinExitStatus, ExecutionResult, StageStatus},
        write::StageSink,
        BuiltinIo,
    },
    state::ShellContext,
};
