//! Activity executions and the closed set of activity results.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{CoreError, CoreResult};

/// One scheduled run of an activity, identified by `(activity, id)`.
///
/// The `id` is chosen by the workflow when it schedules the activity and
/// correlates the schedule decision with the eventual result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityExecution {
    pub activity: String,
    pub id: String,
    #[serde(default)]
    pub input: Option<JsonValue>,
}

impl ActivityExecution {
    pub fn new(activity: impl Into<String>, id: impl Into<String>, input: Option<JsonValue>) -> Self {
        Self {
            activity: activity.into(),
            id: id.into(),
            input,
        }
    }
}

/// Outcome reported when an activity task completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityResult {
    Completed {
        #[serde(default)]
        result: Option<JsonValue>,
    },
    Canceled {
        #[serde(default)]
        details: Option<String>,
    },
    Failed {
        #[serde(default)]
        reason: Option<String>,
        #[serde(default)]
        details: Option<String>,
    },
    #[serde(rename = "timedout")]
    TimedOut {
        #[serde(default)]
        details: Option<String>,
    },
}

impl ActivityResult {
    pub fn completed(result: Option<JsonValue>) -> Self {
        Self::Completed { result }
    }

    pub fn canceled(details: Option<String>) -> Self {
        Self::Canceled { details }
    }

    pub fn failed(reason: Option<String>, details: Option<String>) -> Self {
        Self::Failed { reason, details }
    }

    pub fn timed_out(details: Option<String>) -> Self {
        Self::TimedOut { details }
    }

    pub fn kind(&self) -> ResultKind {
        match self {
            Self::Completed { .. } => ResultKind::Completed,
            Self::Canceled { .. } => ResultKind::Canceled,
            Self::Failed { .. } => ResultKind::Failed,
            Self::TimedOut { .. } => ResultKind::TimedOut,
        }
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }

    /// Decode a tagged JSON result (`{"type": "failed", "reason": ...}`).
    ///
    /// An unknown `type` tag is reported as [`CoreError::UnmappedVariant`].
    pub fn from_json(value: &JsonValue) -> CoreResult<Self> {
        let tag = value
            .get("type")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| CoreError::malformed(ResultKind::VOCABULARY, "missing string field `type`"))?;
        tag.parse::<ResultKind>()?;

        serde_json::from_value(value.clone())
            .map_err(|e| CoreError::malformed(ResultKind::VOCABULARY, e.to_string()))
    }
}

/// Type tags of [`ActivityResult`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ResultKind {
    Completed,
    Canceled,
    Failed,
    TimedOut,
}

impl ResultKind {
    pub const VOCABULARY: &'static str = "activity result";

    pub const ALL: [ResultKind; 4] = [Self::Completed, Self::Canceled, Self::Failed, Self::TimedOut];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Canceled => "canceled",
            Self::Failed => "failed",
            Self::TimedOut => "timedout",
        }
    }
}

impl core::fmt::Display for ResultKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CoreError::unmapped(Self::VOCABULARY, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_every_known_tag() {
        let failed = ActivityResult::from_json(&json!({
            "type": "failed",
            "reason": "boom",
            "details": "stack"
        }))
        .unwrap();
        assert_eq!(
            failed,
            ActivityResult::failed(Some("boom".into()), Some("stack".into()))
        );

        let timed_out = ActivityResult::from_json(&json!({"type": "timedout"})).unwrap();
        assert!(timed_out.is_timed_out());

        let completed = ActivityResult::from_json(&json!({"type": "completed", "result": 3})).unwrap();
        assert_eq!(completed, ActivityResult::completed(Some(json!(3))));
    }

    #[test]
    fn unknown_tag_is_unmapped_not_malformed() {
        let err = ActivityResult::from_json(&json!({"type": "exploded"})).unwrap_err();
        assert_eq!(err, CoreError::unmapped(ResultKind::VOCABULARY, "exploded"));
        assert!(err.is_unmapped());
    }

    #[test]
    fn missing_tag_is_malformed() {
        let err = ActivityResult::from_json(&json!({"details": "x"})).unwrap_err();
        assert!(matches!(err, CoreError::Malformed { .. }));
    }

    #[test]
    fn kind_tags_round_trip_through_from_str() {
        for kind in ResultKind::ALL {
            assert_eq!(kind.as_str().parse::<ResultKind>().unwrap(), kind);
        }
    }
}
