/// Request lifecycle definitions
///
/// This module defines the states a crawl request moves through and the
/// generation token used to recognize superseded responses.
use crate::codec::Report;
use chrono::{DateTime, Utc};
use std::fmt;

/// Generation token for one issued request
///
/// Ids grow monotonically within a session. A response is applied only if its
/// id is still the outstanding one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Represents the current state of the crawl request
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestLifecycle {
    /// Nothing requested yet, or reset
    #[default]
    Idle,

    /// A request is outstanding
    Loading,

    /// The last request returned a payload that decoded cleanly
    Succeeded {
        report: Report,
        fetched_at: DateTime<Utc>,
    },

    /// The last request failed to fetch or to decode
    Failed { message: String },
}

impl RequestLifecycle {
    /// Returns true while a request is outstanding
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns true if the last request finished, either way
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed { .. })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// The held report, if the last request succeeded
    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::Succeeded { report, .. } => Some(report),
            _ => None,
        }
    }

    /// The error text, if the last request failed
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Short lowercase name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for RequestLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
