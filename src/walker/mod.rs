//! Asynchronous recursive walker
//!
//! This module implements a fan-out walk where every directory becomes an
//! independently scheduled listing task, and a shared counter tells the last
//! task out to resolve the walk.
//!
//! # Architecture
//!
//! ```text
//!                     ┌─────────────────────────┐
//!                     │       TreeWalker        │
//!                     │  begin_walk(root, cb)   │
//!                     └───────────┬─────────────┘
//!                                 │ submit(root)
//!                                 ▼
//!                     ┌─────────────────────────┐
//!                     │        Executor         │
//!                     └───────────┬─────────────┘
//!       ┌─────────────────────────┼─────────────────────────┐
//!       │                         │                         │
//! ┌─────▼─────┐             ┌─────▼─────┐             ┌─────▼─────┐
//! │  Task /   │             │  Task /a  │             │  Task /b  │
//! │  list()   │──submit──▶  │  list()   │             │  list()   │
//! │  leaf→cb  │             │  leaf→cb  │             │  leaf→cb  │
//! └─────┬─────┘             └─────┬─────┘             └─────┬─────┘
//!       └──────────── OutstandingWork / CompletionSignal ───┘
//! ```

pub mod callback;
pub mod counter;
pub mod orchestrator;
pub mod signal;
pub mod stats;
mod task;

pub use callback::{callback_fn, EntryCallback};
pub use counter::OutstandingWork;
pub use orchestrator::TreeWalker;
pub use signal::{CompletionSignal, WalkHandle};
pub use stats::{WalkProgress, WalkStats};
