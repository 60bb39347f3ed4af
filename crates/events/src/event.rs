use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::records::{
    ActivityCanceled, ActivityCompleted, ActivityFailed, ActivityScheduled, ActivityStarted,
    ActivityTaskCompleted, ActivityTimedOut, DecisionTaskCompleted, ProcessCanceled,
    ProcessCompleted, ProcessSignaled, ProcessStarted,
};

/// A record published on exactly one channel.
///
/// Records are:
/// - **immutable** (treat them as facts)
/// - **fire-and-forget** (no identity beyond delivery)
/// - bound to a fixed field set, reported by `field_names()`
pub trait ChannelEvent: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// The channel this record is published on.
    const CHANNEL: Channel;

    /// Field names carried by this value, in declaration order.
    fn field_names(&self) -> &'static [&'static str];

    fn into_event(self) -> WorkflowEvent;
}

/// Any workflow event, tagged with its channel.
///
/// Emitters build these and hand them to [`crate::Signals::publish`]; taps receive
/// them regardless of channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "fields", rename_all = "snake_case")]
pub enum WorkflowEvent {
    ProcessStarted(ProcessStarted),
    ProcessCompleted(ProcessCompleted),
    ProcessCanceled(ProcessCanceled),
    ProcessSignaled(ProcessSignaled),
    ActivityScheduled(ActivityScheduled),
    ActivityStarted(ActivityStarted),
    ActivityCompleted(ActivityCompleted),
    ActivityCanceled(ActivityCanceled),
    ActivityFailed(ActivityFailed),
    #[serde(rename = "activity_timedout")]
    ActivityTimedOut(ActivityTimedOut),
    CompleteDecisionTask(DecisionTaskCompleted),
    CompleteActivityTask(ActivityTaskCompleted),
}

impl WorkflowEvent {
    pub fn channel(&self) -> Channel {
        match self {
            Self::ProcessStarted(_) => Channel::ProcessStarted,
            Self::ProcessCompleted(_) => Channel::ProcessCompleted,
            Self::ProcessCanceled(_) => Channel::ProcessCanceled,
            Self::ProcessSignaled(_) => Channel::ProcessSignaled,
            Self::ActivityScheduled(_) => Channel::ActivityScheduled,
            Self::ActivityStarted(_) => Channel::ActivityStarted,
            Self::ActivityCompleted(_) => Channel::ActivityCompleted,
            Self::ActivityCanceled(_) => Channel::ActivityCanceled,
            Self::ActivityFailed(_) => Channel::ActivityFailed,
            Self::ActivityTimedOut(_) => Channel::ActivityTimedOut,
            Self::CompleteDecisionTask(_) => Channel::CompleteDecisionTask,
            Self::CompleteActivityTask(_) => Channel::CompleteActivityTask,
        }
    }

    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            Self::ProcessStarted(e) => e.field_names(),
            Self::ProcessCompleted(e) => e.field_names(),
            Self::ProcessCanceled(e) => e.field_names(),
            Self::ProcessSignaled(e) => e.field_names(),
            Self::ActivityScheduled(e) => e.field_names(),
            Self::ActivityStarted(e) => e.field_names(),
            Self::ActivityCompleted(e) => e.field_names(),
            Self::ActivityCanceled(e) => e.field_names(),
            Self::ActivityFailed(e) => e.field_names(),
            Self::ActivityTimedOut(e) => e.field_names(),
            Self::CompleteDecisionTask(e) => e.field_names(),
            Self::CompleteActivityTask(e) => e.field_names(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowbus_core::{ActivityExecution, ProcessId};

    #[test]
    fn tagged_with_channel_name() {
        let ev: WorkflowEvent = ActivityTimedOut::new(
            Some(ProcessId::new()),
            ActivityExecution::new("a", "1", None),
            Some("late".into()),
        )
        .into();

        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["channel"], "activity_timedout");
        assert_eq!(json["fields"]["details"], "late");
        assert_eq!(ev.channel(), Channel::ActivityTimedOut);

        let back: WorkflowEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, ev);
    }

    #[test]
    fn field_names_follow_the_record() {
        let ev: WorkflowEvent = ProcessCanceled::new(ProcessId::new(), None).into();
        assert_eq!(ev.field_names(), &["process_id", "details"]);
    }
}
