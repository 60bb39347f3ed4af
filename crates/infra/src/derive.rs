//! Event derivation: backend outcomes → workflow events.
//!
//! Pure functions, no publishing. The tables here are exhaustive matches over
//! the closed decision/result vocabularies, so a new kind does not compile
//! until someone decides which channel (if any) reports it.

use tracing::warn;

use flowbus_core::{ActivityExecution, ActivityResult, ActivityTask, Decision, DecisionTask, HistoryEvent, Process};
use flowbus_events::{
    ActivityCanceled, ActivityCompleted, ActivityFailed, ActivityScheduled, ActivityTimedOut,
    ProcessCanceled, ProcessCompleted, ProcessStarted, WorkflowEvent,
};

/// The event a completed decision reports, if its kind maps to a channel.
pub fn decision_event(task: &DecisionTask, decision: &Decision) -> Option<WorkflowEvent> {
    match decision {
        Decision::ScheduleActivity {
            activity, id, input, ..
        } => Some(
            ActivityScheduled::new(
                task.process.clone(),
                ActivityExecution::new(activity.clone(), id.clone(), input.clone()),
            )
            .into(),
        ),
        Decision::CancelActivity { id } => {
            let execution = resolve_execution(&task.process, id).unwrap_or_else(|| {
                warn!(
                    process_id = %task.process_id,
                    activity_id = %id,
                    "canceled activity was never scheduled in this history"
                );
                ActivityExecution::new(String::new(), id.clone(), None)
            });
            Some(ActivityCanceled::new(task.process_id, None, execution).into())
        }
        Decision::CompleteProcess { result } => {
            Some(ProcessCompleted::new(task.process.clone(), task.process_id, result.clone()).into())
        }
        Decision::CancelProcess { details } => {
            Some(ProcessCanceled::new(task.process_id, details.clone()).into())
        }
        // The backend assigns the child id later; polling the child reports it.
        Decision::StartChildProcess { .. } => None,
        Decision::Timer { .. } => None,
    }
}

/// The event an activity result reports. Total over the result vocabulary.
pub fn result_event(task: &ActivityTask, result: &ActivityResult) -> WorkflowEvent {
    let execution = task.activity_execution.clone();
    match result {
        ActivityResult::Completed { result } => {
            ActivityCompleted::new(task.process_id, result.clone(), execution).into()
        }
        ActivityResult::Canceled { details } => {
            ActivityCanceled::new(task.process_id, details.clone(), execution).into()
        }
        ActivityResult::Failed { reason, details } => {
            ActivityFailed::new(task.process_id, reason.clone(), details.clone(), execution).into()
        }
        ActivityResult::TimedOut { details } => {
            ActivityTimedOut::new(Some(task.process_id), execution, details.clone()).into()
        }
    }
}

/// Events only observable by looking at a polled task's unseen history.
///
/// - a child process's first `ProcessStarted` entry (its id is known by now)
/// - activity results the backend recorded as timed out
pub fn poll_events(task: &DecisionTask) -> Vec<WorkflowEvent> {
    let process = &task.process;
    let mut events = Vec::new();

    for entry in process.unseen_events() {
        if let (HistoryEvent::ProcessStarted { .. }, Some(parent)) = (entry, process.parent) {
            events.push(ProcessStarted::child(process.clone(), task.process_id, parent).into());
        }

        if let (Some(ActivityResult::TimedOut { details }), Some(execution)) =
            (entry.activity_result(), entry.activity_execution())
        {
            events.push(ActivityTimedOut::new(Some(task.process_id), execution.clone(), details.clone()).into());
        }
    }

    events
}

/// Find what a `ScheduleActivity` decision with `id` scheduled, newest first.
fn resolve_execution(process: &Process, id: &str) -> Option<ActivityExecution> {
    process.history.iter().rev().find_map(|entry| match entry {
        HistoryEvent::Decision { decision, .. } => decision
            .scheduled_execution()
            .filter(|execution| execution.id == id),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowbus_core::{DecisionKind, ProcessId, ResultKind};
    use flowbus_events::Channel;
    use serde_json::json;

    fn task_with(history: Vec<HistoryEvent>) -> DecisionTask {
        let pid = ProcessId::new();
        DecisionTask::new(pid, Process::new("wf").with_id(pid).with_history(history))
    }

    fn channel_for(kind: DecisionKind) -> Option<Channel> {
        let decision = match kind {
            DecisionKind::ScheduleActivity => Decision::schedule_activity("a", "1", None),
            DecisionKind::CancelActivity => Decision::cancel_activity("1"),
            DecisionKind::CompleteProcess => Decision::complete_process(None),
            DecisionKind::CancelProcess => Decision::cancel_process(None),
            DecisionKind::StartChildProcess => Decision::start_child_process(Process::new("child")),
            DecisionKind::Timer => Decision::timer(10, None),
        };
        decision_event(&task_with(vec![]), &decision).map(|ev| ev.channel())
    }

    #[test]
    fn decision_table() {
        let table: Vec<_> = DecisionKind::ALL.into_iter().map(|k| (k, channel_for(k))).collect();
        assert_eq!(
            table,
            vec![
                (DecisionKind::ScheduleActivity, Some(Channel::ActivityScheduled)),
                (DecisionKind::CancelActivity, Some(Channel::ActivityCanceled)),
                (DecisionKind::CompleteProcess, Some(Channel::ProcessCompleted)),
                (DecisionKind::CancelProcess, Some(Channel::ProcessCanceled)),
                (DecisionKind::StartChildProcess, None),
                (DecisionKind::Timer, None),
            ]
        );
    }

    #[test]
    fn result_table_is_total() {
        let task = ActivityTask::new(ActivityExecution::new("a", "1", None), ProcessId::new());
        let channels: Vec<_> = ResultKind::ALL
            .into_iter()
            .map(|kind| {
                let result = match kind {
                    ResultKind::Completed => ActivityResult::completed(None),
                    ResultKind::Canceled => ActivityResult::canceled(None),
                    ResultKind::Failed => ActivityResult::failed(None, None),
                    ResultKind::TimedOut => ActivityResult::timed_out(None),
                };
                result_event(&task, &result).channel()
            })
            .collect();

        assert_eq!(
            channels,
            vec![
                Channel::ActivityCompleted,
                Channel::ActivityCanceled,
                Channel::ActivityFailed,
                Channel::ActivityTimedOut,
            ]
        );
    }

    #[test]
    fn schedule_activity_carries_the_execution() {
        let task = task_with(vec![]);
        let ev = decision_event(&task, &Decision::schedule_activity("double", "d1", Some(json!(3)))).unwrap();
        match ev {
            WorkflowEvent::ActivityScheduled(e) => {
                assert_eq!(e.activity_execution, ActivityExecution::new("double", "d1", Some(json!(3))));
                assert_eq!(e.process, task.process);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn cancel_activity_resolves_the_scheduled_execution() {
        let task = task_with(vec![
            HistoryEvent::process_started(),
            HistoryEvent::decision(Decision::schedule_activity("double", "d1", Some(json!(3)))),
        ]);

        match decision_event(&task, &Decision::cancel_activity("d1")).unwrap() {
            WorkflowEvent::ActivityCanceled(e) => {
                assert_eq!(e.process_id, task.process_id);
                assert_eq!(e.activity_execution.activity, "double");
                assert_eq!(e.activity_execution.input, Some(json!(3)));
                assert_eq!(e.details, None);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn cancel_of_unknown_activity_still_reports_the_id() {
        let task = task_with(vec![HistoryEvent::process_started()]);
        match decision_event(&task, &Decision::cancel_activity("ghost")).unwrap() {
            WorkflowEvent::ActivityCanceled(e) => {
                assert_eq!(e.activity_execution.id, "ghost");
                assert!(e.activity_execution.activity.is_empty());
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn poll_reports_child_start_once_parent_is_known() {
        let parent = ProcessId::new();
        let child = ProcessId::new();
        let task = DecisionTask::new(
            child,
            Process::new("child")
                .with_id(child)
                .with_parent(parent)
                .with_history(vec![HistoryEvent::process_started()]),
        );

        let events = poll_events(&task);
        assert_eq!(events.len(), 1);
        match &events[0] {
            WorkflowEvent::ProcessStarted(e) => {
                assert_eq!(e.process_id, child);
                assert_eq!(e.parent_process_id, Some(parent));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn poll_ignores_root_process_start() {
        let task = task_with(vec![HistoryEvent::process_started()]);
        assert!(poll_events(&task).is_empty());
    }

    #[test]
    fn poll_reports_unseen_timeouts_only() {
        let old = ActivityExecution::new("a", "old", None);
        let new = ActivityExecution::new("a", "new", None);
        let task = task_with(vec![
            HistoryEvent::process_started(),
            HistoryEvent::activity(old, ActivityResult::timed_out(Some("seen".into()))),
            HistoryEvent::decision(Decision::timer(1, None)),
            HistoryEvent::activity(new.clone(), ActivityResult::timed_out(Some("late".into()))),
            HistoryEvent::activity(
                ActivityExecution::new("a", "ok", None),
                ActivityResult::completed(None),
            ),
        ]);

        let events = poll_events(&task);
        assert_eq!(events.len(), 1);
        match &events[0] {
            WorkflowEvent::ActivityTimedOut(e) => {
                assert_eq!(e.activity_execution, new);
                assert_eq!(e.details.as_deref(), Some("late"));
                assert_eq!(e.process_id, Some(task.process_id));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
