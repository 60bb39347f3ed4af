//! Channel name table.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Every event channel a workflow decorator can publish on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    ProcessStarted,
    ProcessCompleted,
    ProcessCanceled,
    ProcessSignaled,
    ActivityScheduled,
    /// Reserved: no backend outcome maps here yet.
    ActivityStarted,
    ActivityCompleted,
    ActivityCanceled,
    ActivityFailed,
    #[serde(rename = "activity_timedout")]
    ActivityTimedOut,
    CompleteDecisionTask,
    CompleteActivityTask,
}

impl Channel {
    pub const ALL: [Channel; 12] = [
        Self::ProcessStarted,
        Self::ProcessCompleted,
        Self::ProcessCanceled,
        Self::ProcessSignaled,
        Self::ActivityScheduled,
        Self::ActivityStarted,
        Self::ActivityCompleted,
        Self::ActivityCanceled,
        Self::ActivityFailed,
        Self::ActivityTimedOut,
        Self::CompleteDecisionTask,
        Self::CompleteActivityTask,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProcessStarted => "process_started",
            Self::ProcessCompleted => "process_completed",
            Self::ProcessCanceled => "process_canceled",
            Self::ProcessSignaled => "process_signaled",
            Self::ActivityScheduled => "activity_scheduled",
            Self::ActivityStarted => "activity_started",
            Self::ActivityCompleted => "activity_completed",
            Self::ActivityCanceled => "activity_canceled",
            Self::ActivityFailed => "activity_failed",
            Self::ActivityTimedOut => "activity_timedout",
            Self::CompleteDecisionTask => "complete_decision_task",
            Self::CompleteActivityTask => "complete_activity_task",
        }
    }
}

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown channel: {0:?}")]
pub struct UnknownChannel(pub String);

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownChannel(s.to_string()))
    }
}
