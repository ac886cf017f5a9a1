//! Event types emitted by speech engine adapters

use serde::{Deserialize, Serialize};

/// A lifecycle event for the currently submitted job.
///
/// Per submission the stream delivers zero or more [`EngineEvent::Started`]
/// notifications, then exactly one terminal sequence: a
/// [`EngineEvent::ResultAvailable`] followed by [`EngineEvent::Done`], or a
/// [`EngineEvent::NotFound`] directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EngineEvent {
    /// Processing has started (informational)
    Started,

    /// Raw transcript text is available for the current job
    ResultAvailable(String),

    /// The current job finished processing
    Done,

    /// The engine could not find the submitted file
    NotFound,
}

impl EngineEvent {
    /// Whether this event ends the current job's lifecycle
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::NotFound)
    }
}

impl std::fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Started => write!(f, "started"),
            Self::ResultAvailable(_) => write!(f, "result_available"),
            Self::Done => write!(f, "done"),
            Self::NotFound => write!(f, "not_found"),
        }
    }
}
