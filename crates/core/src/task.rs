//! Units of work handed out by a backend.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::activity::ActivityExecution;
use crate::id::ProcessId;
use crate::process::Process;

/// Work handed to workflow logic so it can decide the next steps.
///
/// `process` carries the full history; `context` is opaque backend data used to
/// correlate the completion with this task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionTask {
    pub process_id: ProcessId,
    pub process: Process,
    #[serde(default)]
    pub context: Option<JsonValue>,
}

impl DecisionTask {
    pub fn new(process_id: ProcessId, process: Process) -> Self {
        Self {
            process_id,
            process,
            context: None,
        }
    }
}

/// Work handed to an activity worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTask {
    pub activity_execution: ActivityExecution,
    pub process_id: ProcessId,
    #[serde(default)]
    pub context: Option<JsonValue>,
}

impl ActivityTask {
    pub fn new(activity_execution: ActivityExecution, process_id: ProcessId) -> Self {
        Self {
            activity_execution,
            process_id,
            context: None,
        }
    }
}
