//! One typed record per channel.
//!
//! Each record's fields are exactly its channel's schema; constructors are the
//! only way emitters build them. `field_names()` (via [`ChannelEvent`]) reports
//! the schema of a concrete value, which matters for `process_started`: the
//! `parent_process_id` field exists only when a child process was discovered
//! while polling.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use flowbus_core::{
    ActivityExecution, ActivityResult, ActivityTask, DecisionTask, Decisions, Process, ProcessId,
};

use crate::channel::Channel;
use crate::event::{ChannelEvent, WorkflowEvent};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStarted {
    pub process: Process,
    pub process_id: ProcessId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_process_id: Option<ProcessId>,
}

impl ProcessStarted {
    /// A root process was started by a caller.
    pub fn new(process: Process, process_id: ProcessId) -> Self {
        Self {
            process,
            process_id,
            parent_process_id: None,
        }
    }

    /// A child process became visible through its first decision task.
    pub fn child(process: Process, process_id: ProcessId, parent_process_id: ProcessId) -> Self {
        Self {
            process,
            process_id,
            parent_process_id: Some(parent_process_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessCompleted {
    pub process: Process,
    pub process_id: ProcessId,
    pub result: Option<JsonValue>,
}

impl ProcessCompleted {
    pub fn new(process: Process, process_id: ProcessId, result: Option<JsonValue>) -> Self {
        Self {
            process,
            process_id,
            result,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessCanceled {
    pub process_id: ProcessId,
    pub details: Option<String>,
}

impl ProcessCanceled {
    pub fn new(process_id: ProcessId, details: Option<String>) -> Self {
        Self {
            process_id,
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSignaled {
    pub process_id: ProcessId,
    pub signal: String,
    pub data: Option<JsonValue>,
}

impl ProcessSignaled {
    pub fn new(process_id: ProcessId, signal: impl Into<String>, data: Option<JsonValue>) -> Self {
        Self {
            process_id,
            signal: signal.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityScheduled {
    pub process: Process,
    pub activity_execution: ActivityExecution,
}

impl ActivityScheduled {
    pub fn new(process: Process, activity_execution: ActivityExecution) -> Self {
        Self {
            process,
            activity_execution,
        }
    }
}

/// Reserved record: nothing emits `activity_started` today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityStarted {
    pub process_id: ProcessId,
    pub activity_execution: ActivityExecution,
}

impl ActivityStarted {
    pub fn new(process_id: ProcessId, activity_execution: ActivityExecution) -> Self {
        Self {
            process_id,
            activity_execution,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCompleted {
    pub process_id: ProcessId,
    pub result: Option<JsonValue>,
    pub activity_execution: ActivityExecution,
}

impl ActivityCompleted {
    pub fn new(process_id: ProcessId, result: Option<JsonValue>, activity_execution: ActivityExecution) -> Self {
        Self {
            process_id,
            result,
            activity_execution,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCanceled {
    pub process_id: ProcessId,
    pub details: Option<String>,
    pub activity_execution: ActivityExecution,
}

impl ActivityCanceled {
    pub fn new(process_id: ProcessId, details: Option<String>, activity_execution: ActivityExecution) -> Self {
        Self {
            process_id,
            details,
            activity_execution,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityFailed {
    pub process_id: ProcessId,
    pub reason: Option<String>,
    pub details: Option<String>,
    pub activity_execution: ActivityExecution,
}

impl ActivityFailed {
    pub fn new(
        process_id: ProcessId,
        reason: Option<String>,
        details: Option<String>,
        activity_execution: ActivityExecution,
    ) -> Self {
        Self {
            process_id,
            reason,
            details,
            activity_execution,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTimedOut {
    pub process_id: Option<ProcessId>,
    pub activity_execution: ActivityExecution,
    pub details: Option<String>,
}

impl ActivityTimedOut {
    pub fn new(
        process_id: Option<ProcessId>,
        activity_execution: ActivityExecution,
        details: Option<String>,
    ) -> Self {
        Self {
            process_id,
            activity_execution,
            details,
        }
    }
}

/// Published on `complete_decision_task` before any decision-derived event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionTaskCompleted {
    pub task: DecisionTask,
    pub decisions: Decisions,
}

impl DecisionTaskCompleted {
    pub fn new(task: DecisionTask, decisions: Decisions) -> Self {
        Self { task, decisions }
    }
}

/// Published on `complete_activity_task` before the result-derived event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTaskCompleted {
    pub task: ActivityTask,
    pub result: ActivityResult,
}

impl ActivityTaskCompleted {
    pub fn new(task: ActivityTask, result: ActivityResult) -> Self {
        Self { task, result }
    }
}

macro_rules! channel_event {
    ($record:ident, $channel:ident, [$($field:literal),+ $(,)?]) => {
        impl ChannelEvent for $record {
            const CHANNEL: Channel = Channel::$channel;

            fn field_names(&self) -> &'static [&'static str] {
                &[$($field),+]
            }

            fn into_event(self) -> WorkflowEvent {
                WorkflowEvent::$channel(self)
            }
        }

        impl From<$record> for WorkflowEvent {
            fn from(value: $record) -> Self {
                WorkflowEvent::$channel(value)
            }
        }
    };
}

channel_event!(ProcessCompleted, ProcessCompleted, ["process", "process_id", "result"]);
channel_event!(ProcessCanceled, ProcessCanceled, ["process_id", "details"]);
channel_event!(ProcessSignaled, ProcessSignaled, ["process_id", "signal", "data"]);
channel_event!(ActivityScheduled, ActivityScheduled, ["process", "activity_execution"]);
channel_event!(ActivityStarted, ActivityStarted, ["process_id", "activity_execution"]);
channel_event!(ActivityCompleted, ActivityCompleted, ["process_id", "result", "activity_execution"]);
channel_event!(ActivityCanceled, ActivityCanceled, ["process_id", "details", "activity_execution"]);
channel_event!(
    ActivityFailed,
    ActivityFailed,
    ["process_id", "reason", "details", "activity_execution"]
);
channel_event!(ActivityTimedOut, ActivityTimedOut, ["process_id", "activity_execution", "details"]);
channel_event!(DecisionTaskCompleted, CompleteDecisionTask, ["task", "decisions"]);
channel_event!(ActivityTaskCompleted, CompleteActivityTask, ["task", "result"]);

impl ChannelEvent for ProcessStarted {
    const CHANNEL: Channel = Channel::ProcessStarted;

    fn field_names(&self) -> &'static [&'static str] {
        if self.parent_process_id.is_some() {
            &["process", "process_id", "parent_process_id"]
        } else {
            &["process", "process_id"]
        }
    }

    fn into_event(self) -> WorkflowEvent {
        WorkflowEvent::ProcessStarted(self)
    }
}

impl From<ProcessStarted> for WorkflowEvent {
    fn from(value: ProcessStarted) -> Self {
        WorkflowEvent::ProcessStarted(value)
    }
}
