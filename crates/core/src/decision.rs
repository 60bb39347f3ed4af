//! Decisions emitted by workflow logic when completing a decision task.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::activity::ActivityExecution;
use crate::error::{CoreError, CoreResult};
use crate::process::Process;

/// An instruction emitted when completing a decision task.
///
/// The set is closed: code that maps decisions to anything must match
/// exhaustively so a new kind cannot be silently skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Decision {
    ScheduleActivity {
        activity: String,
        id: String,
        #[serde(default)]
        input: Option<JsonValue>,
        #[serde(default)]
        category: Option<String>,
    },
    CancelActivity {
        id: String,
    },
    CompleteProcess {
        #[serde(default)]
        result: Option<JsonValue>,
    },
    CancelProcess {
        #[serde(default)]
        details: Option<String>,
    },
    StartChildProcess {
        process: Process,
    },
    Timer {
        delay_secs: u64,
        #[serde(default)]
        data: Option<JsonValue>,
    },
}

impl Decision {
    pub fn schedule_activity(
        activity: impl Into<String>,
        id: impl Into<String>,
        input: Option<JsonValue>,
    ) -> Self {
        Self::ScheduleActivity {
            activity: activity.into(),
            id: id.into(),
            input,
            category: None,
        }
    }

    pub fn cancel_activity(id: impl Into<String>) -> Self {
        Self::CancelActivity { id: id.into() }
    }

    pub fn complete_process(result: Option<JsonValue>) -> Self {
        Self::CompleteProcess { result }
    }

    pub fn cancel_process(details: Option<String>) -> Self {
        Self::CancelProcess { details }
    }

    pub fn start_child_process(process: Process) -> Self {
        Self::StartChildProcess { process }
    }

    pub fn timer(delay_secs: u64, data: Option<JsonValue>) -> Self {
        Self::Timer { delay_secs, data }
    }

    pub fn kind(&self) -> DecisionKind {
        match self {
            Self::ScheduleActivity { .. } => DecisionKind::ScheduleActivity,
            Self::CancelActivity { .. } => DecisionKind::CancelActivity,
            Self::CompleteProcess { .. } => DecisionKind::CompleteProcess,
            Self::CancelProcess { .. } => DecisionKind::CancelProcess,
            Self::StartChildProcess { .. } => DecisionKind::StartChildProcess,
            Self::Timer { .. } => DecisionKind::Timer,
        }
    }

    /// The activity execution a `ScheduleActivity` decision creates.
    pub fn scheduled_execution(&self) -> Option<ActivityExecution> {
        match self {
            Self::ScheduleActivity {
                activity, id, input, ..
            } => Some(ActivityExecution::new(activity.clone(), id.clone(), input.clone())),
            _ => None,
        }
    }

    /// Decode a tagged JSON decision (`{"type": "schedule_activity", ...}`).
    ///
    /// An unknown `type` tag is reported as [`CoreError::UnmappedVariant`].
    pub fn from_json(value: &JsonValue) -> CoreResult<Self> {
        let tag = value
            .get("type")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| CoreError::malformed(DecisionKind::VOCABULARY, "missing string field `type`"))?;
        tag.parse::<DecisionKind>()?;

        serde_json::from_value(value.clone())
            .map_err(|e| CoreError::malformed(DecisionKind::VOCABULARY, e.to_string()))
    }
}

/// Type tags of [`Decision`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DecisionKind {
    ScheduleActivity,
    CancelActivity,
    CompleteProcess,
    CancelProcess,
    StartChildProcess,
    Timer,
}

impl DecisionKind {
    pub const VOCABULARY: &'static str = "decision";

    pub const ALL: [DecisionKind; 6] = [
        Self::ScheduleActivity,
        Self::CancelActivity,
        Self::CompleteProcess,
        Self::CancelProcess,
        Self::StartChildProcess,
        Self::Timer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ScheduleActivity => "schedule_activity",
            Self::CancelActivity => "cancel_activity",
            Self::CompleteProcess => "complete_process",
            Self::CancelProcess => "cancel_process",
            Self::StartChildProcess => "start_child_process",
            Self::Timer => "timer",
        }
    }
}

impl core::fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CoreError::unmapped(Self::VOCABULARY, s))
    }
}

/// One decision or an ordered batch of them.
///
/// Workflows may answer a decision task with a single decision or a list;
/// both are iterated the same way, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Decisions {
    One(Decision),
    Many(Vec<Decision>),
}

impl Decisions {
    pub fn iter(&self) -> core::slice::Iter<'_, Decision> {
        self.as_slice().iter()
    }

    pub fn as_slice(&self) -> &[Decision] {
        match self {
            Self::One(decision) => core::slice::from_ref(decision),
            Self::Many(decisions) => decisions,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<Decision> for Decisions {
    fn from(value: Decision) -> Self {
        Self::One(value)
    }
}

impl From<Vec<Decision>> for Decisions {
    fn from(value: Vec<Decision>) -> Self {
        Self::Many(value)
    }
}

impl<'a> IntoIterator for &'a Decisions {
    type Item = &'a Decision;
    type IntoIter = core::slice::Iter<'a, Decision>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
