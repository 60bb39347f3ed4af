//! Processes: running instances of a workflow definition.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::history::HistoryEvent;
use crate::id::ProcessId;

/// One running instance of a workflow definition.
///
/// `id` is `None` until the backend starts the process. `parent` is set for
/// child processes started through a `StartChildProcess` decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    #[serde(default)]
    pub id: Option<ProcessId>,
    pub workflow: String,
    #[serde(default)]
    pub input: Option<JsonValue>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parent: Option<ProcessId>,
    #[serde(default)]
    pub history: Vec<HistoryEvent>,
}

impl Process {
    pub fn new(workflow: impl Into<String>) -> Self {
        Self {
            id: None,
            workflow: workflow.into(),
            input: None,
            tags: Vec::new(),
            parent: None,
            history: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: ProcessId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_input(mut self, input: JsonValue) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parent(mut self, parent: ProcessId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_history(mut self, history: Vec<HistoryEvent>) -> Self {
        self.history = history;
        self
    }

    pub fn is_child(&self) -> bool {
        self.parent.is_some()
    }

    /// History entries the workflow has not decided upon yet.
    ///
    /// Everything after the most recent `Decision` entry, in append order; the
    /// whole history if the workflow never decided.
    pub fn unseen_events(&self) -> &[HistoryEvent] {
        let start = self
            .history
            .iter()
            .rposition(HistoryEvent::is_decision)
            .map_or(0, |idx| idx + 1);
        &self.history[start..]
    }
}

/// Terminal outcome of a process, as recorded in its parent's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProcessResult {
    Completed {
        #[serde(default)]
        result: Option<JsonValue>,
    },
    Canceled {
        #[serde(default)]
        details: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActivityExecution, ActivityResult, Decision};
    use proptest::prelude::*;

    #[test]
    fn fresh_process_sees_whole_history() {
        let process = Process::new("wf").with_history(vec![
            HistoryEvent::process_started(),
            HistoryEvent::signal("go", None),
        ]);
        assert_eq!(process.unseen_events().len(), 2);
    }

    #[test]
    fn unseen_events_start_after_last_decision() {
        let timeout = HistoryEvent::activity(
            ActivityExecution::new("a", "1", None),
            ActivityResult::timed_out(None),
        );
        let process = Process::new("wf").with_history(vec![
            HistoryEvent::process_started(),
            HistoryEvent::decision(Decision::schedule_activity("a", "1", None)),
            HistoryEvent::signal("go", None),
            HistoryEvent::decision(Decision::timer(1, None)),
            timeout.clone(),
        ]);

        assert_eq!(process.unseen_events(), &[timeout][..]);
    }

    #[test]
    fn nothing_unseen_right_after_a_decision() {
        let process = Process::new("wf").with_history(vec![
            HistoryEvent::process_started(),
            HistoryEvent::decision(Decision::complete_process(None)),
        ]);
        assert!(process.unseen_events().is_empty());
    }

    #[test]
    fn builders_fill_fields() {
        let parent = ProcessId::new();
        let process = Process::new("child")
            .with_parent(parent)
            .with_tags(["a", "b"])
            .with_input(serde_json::json!({"n": 1}));
        assert!(process.is_child());
        assert_eq!(process.tags, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(process.id, None);
    }

    fn entry_strategy() -> impl Strategy<Value = HistoryEvent> {
        prop_oneof![
            Just(HistoryEvent::process_started()),
            (0u64..60).prop_map(|d| HistoryEvent::decision(Decision::timer(d, None))),
            "[a-z]{1,6}".prop_map(|s| HistoryEvent::signal(s, None)),
            "[0-9]{1,3}".prop_map(|id| HistoryEvent::activity(
                ActivityExecution::new("a", id, None),
                ActivityResult::timed_out(None),
            )),
        ]
    }

    proptest! {
        /// Property: the unseen part is the decision-free suffix that follows the last decision.
        #[test]
        fn unseen_events_is_the_suffix_after_the_last_decision(
            history in prop::collection::vec(entry_strategy(), 0..20)
        ) {
            let process = Process::new("wf").with_history(history.clone());
            let unseen = process.unseen_events();
            let start = history.len() - unseen.len();

            prop_assert_eq!(unseen, &history[start..]);
            prop_assert!(unseen.iter().all(|e| !e.is_decision()));
            if start > 0 {
                prop_assert!(history[start - 1].is_decision());
            }
        }
    }
}
