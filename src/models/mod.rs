// Core data models for Stagesync
// These structs represent the domain entities

pub mod workflow;
pub mod project;
pub mod task;

pub use workflow::*;
pub use project::*;
pub use task::*;
