// Synchronization engine
//
// Keeps a project's pipeline stage, task states, and progress percentage
// consistent. The cascade resolver is pure; the transition coordinator
// wraps every move in a single transaction; the progress aggregator always
// derives from persisted task state, never from a cached percentage.

pub mod cascade;
pub mod error;
pub mod progress;
pub mod transition;

pub use cascade::resolve;
pub use error::EngineError;
pub use progress::{progress, ProgressSummary};
pub use transition::{move_project, TransitionResult};
