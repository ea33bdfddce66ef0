/// Lifecycle state definitions for a poll session
use std::fmt;

/// Represents where a poll session is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Created, no cycle performed yet
    Init,

    /// At least one cycle done, another one is due after the poll interval
    Polling,

    /// Finished; a terminated session never polls again
    Terminated(TerminationReason),
}

impl SessionState {
    /// Returns true if this is the terminal state
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated(_))
    }

    /// The termination reason, if the session has ended
    pub fn termination(&self) -> Option<&TerminationReason> {
        match self {
            Self::Terminated(reason) => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::Polling => write!(f, "polling"),
            Self::Terminated(reason) => write!(f, "terminated ({})", reason),
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// Monitoring was off; exactly one cycle ran
    SingleShot,

    /// The thread's first post carried a closed flag
    ThreadClosed,

    /// A thread fetch failed after the initial cycle
    FetchFailed(String),

    /// Writing the archive failed
    StoreFailed(String),

    /// The stop signal fired while fetching or sleeping
    Cancelled,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleShot => write!(f, "single fetch complete"),
            Self::ThreadClosed => write!(f, "thread closed"),
            Self::FetchFailed(error) => write!(f, "fetch failed: {}", error),
            Self::StoreFailed(error) => write!(f, "store failed: {}", error),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}
