#[macro_use]
extern crate tracing;

pub mod builtins;
pub mod cmd;
pub mod config;
pub mod history;
pub mod input;
pub mod parse;
pub mod prelude;
pub mod process;
pub mod state;

pub use cmd::execution_plan::ExecutionPlan;
pub use parse::parse_command;
pub use process::status::ExecutionResult;
pub use state::ShellContext;
