//! Ordering-preserving task execution.
//!
//! Tasks submitted for the same component id always run in submission
//! order; tasks for different ids may run concurrently. Components are
//! spread across a fixed number of shards.

pub mod sequenced;

pub use self::sequenced::{
    ExecutorId, InlineSequencedExecutor, SequencedTaskExecutor, Task, ThreadedSequencedExecutor,
};
