pub mod conduit;
pub mod execute;
pub mod execution_plan;
pub mod resolve;
pub mod stage;
