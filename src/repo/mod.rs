pub mod pipeline;
pub mod project;
pub mod task;

pub use pipeline::*;
pub use project::*;
pub use task::*;
