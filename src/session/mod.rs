//! Poll sessions
//!
//! A session archives one thread: an initial cycle, then (when monitoring)
//! further cycles at a fixed interval until the thread closes, a fetch fails
//! or the stop signal fires.

mod controller;
mod report;
mod state;

pub use controller::{PollSession, SessionConfig};
pub use report::{CycleReport, SessionReport};
pub use state::{SessionState, TerminationReason};
