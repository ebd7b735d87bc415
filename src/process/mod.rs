pub mod child;
pub mod read;
pub mod status;
pub mod write;

/// The streams a builtin is allowed to touch.
pub struct BuiltinIo {
    pub stdin: read::StageSource,
    pub stdout: write::StageSink,
    pub stderr: write::StageSink,
}

impl BuiltinIo {
    /// Empty input, both outputs collected in memory.
    pub fn buffered() -> Self {
        BuiltinIo {
            stdin: read::StageSource::empty(),
            stdout: write::StageSink::buffer(),
            stderr: write::StageSink::buffer(),
        }
    }
}
