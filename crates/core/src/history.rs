//! Process history: the append-only log a backend keeps per process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::activity::{ActivityExecution, ActivityResult};
use crate::decision::Decision;
use crate::id::ProcessId;
use crate::process::ProcessResult;

/// One entry in a process history.
///
/// Entries are facts appended by the backend; nothing in this workspace
/// mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryEvent {
    /// The process began running. First entry of every history.
    ProcessStarted { occurred_at: DateTime<Utc> },
    /// The workflow decided; marks every earlier entry as seen.
    Decision {
        decision: Decision,
        occurred_at: DateTime<Utc>,
    },
    /// An activity produced a result (including a backend-detected timeout).
    Activity {
        activity_execution: ActivityExecution,
        result: ActivityResult,
        occurred_at: DateTime<Utc>,
    },
    Signal {
        signal: String,
        #[serde(default)]
        data: Option<JsonValue>,
        occurred_at: DateTime<Utc>,
    },
    /// A child process started by this one finished.
    ChildProcess {
        process_id: ProcessId,
        workflow: String,
        #[serde(default)]
        tags: Vec<String>,
        result: ProcessResult,
        occurred_at: DateTime<Utc>,
    },
    Timer {
        #[serde(default)]
        data: Option<JsonValue>,
        occurred_at: DateTime<Utc>,
    },
}

impl HistoryEvent {
    pub fn process_started() -> Self {
        Self::ProcessStarted {
            occurred_at: Utc::now(),
        }
    }

    pub fn decision(decision: Decision) -> Self {
        Self::Decision {
            decision,
            occurred_at: Utc::now(),
        }
    }

    pub fn activity(activity_execution: ActivityExecution, result: ActivityResult) -> Self {
        Self::Activity {
            activity_execution,
            result,
            occurred_at: Utc::now(),
        }
    }

    pub fn signal(signal: impl Into<String>, data: Option<JsonValue>) -> Self {
        Self::Signal {
            signal: signal.into(),
            data,
            occurred_at: Utc::now(),
        }
    }

    pub fn child_process(
        process_id: ProcessId,
        workflow: impl Into<String>,
        result: ProcessResult,
    ) -> Self {
        Self::ChildProcess {
            process_id,
            workflow: workflow.into(),
            tags: Vec::new(),
            result,
            occurred_at: Utc::now(),
        }
    }

    pub fn timer(data: Option<JsonValue>) -> Self {
        Self::Timer {
            data,
            occurred_at: Utc::now(),
        }
    }

    /// Stable type tag (matches the serialized `type` field).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ProcessStarted { .. } => "process_started",
            Self::Decision { .. } => "decision",
            Self::Activity { .. } => "activity",
            Self::Signal { .. } => "signal",
            Self::ChildProcess { .. } => "child_process",
            Self::Timer { .. } => "timer",
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::ProcessStarted { occurred_at }
            | Self::Decision { occurred_at, .. }
            | Self::Activity { occurred_at, .. }
            | Self::Signal { occurred_at, .. }
            | Self::ChildProcess { occurred_at, .. }
            | Self::Timer { occurred_at, .. } => *occurred_at,
        }
    }

    pub fn is_decision(&self) -> bool {
        matches!(self, Self::Decision { .. })
    }

    /// The activity result, for result-bearing entries.
    pub fn activity_result(&self) -> Option<&ActivityResult> {
        match self {
            Self::Activity { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn activity_execution(&self) -> Option<&ActivityExecution> {
        match self {
            Self::Activity {
                activity_execution, ..
            } => Some(activity_execution),
            _ => None,
        }
    }
}
