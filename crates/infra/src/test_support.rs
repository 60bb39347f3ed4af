//! Test doubles: a scripted backend and an event recorder.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value as JsonValue;

use flowbus_core::{
    ActivityOptions, ActivityResult, ActivityTask, Backend, BackendError, DecisionTask, Decisions,
    HistoryEvent, Process, ProcessId, WorkflowOptions,
};
use flowbus_events::{Channel, Signals, WorkflowEvent};

/// In-memory backend that records calls, serves queued tasks and fails on demand.
///
/// Not a workflow engine: it keeps started processes so lookups work, and
/// otherwise just answers what the test scripted.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    calls: Mutex<Vec<&'static str>>,
    processes: Mutex<Vec<Process>>,
    decision_tasks: Mutex<VecDeque<DecisionTask>>,
    activity_tasks: Mutex<VecDeque<ActivityTask>>,
    fail_next: Mutex<Option<BackendError>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_decision_task(&self, task: DecisionTask) {
        self.decision_tasks.lock().unwrap().push_back(task);
    }

    pub fn push_activity_task(&self, task: ActivityTask) {
        self.activity_tasks.lock().unwrap().push_back(task);
    }

    /// Make the next call (whatever it is) fail with `error`.
    pub fn fail_next(&self, error: BackendError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn step(&self, call: &'static str) -> Result<(), BackendError> {
        self.calls.lock().unwrap().push(call);
        match self.fail_next.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Backend for ScriptedBackend {
    type Error = BackendError;

    fn register_workflow(&self, _name: &str, _options: &WorkflowOptions) -> Result<(), Self::Error> {
        self.step("register_workflow")
    }

    fn register_activity(&self, _name: &str, _options: &ActivityOptions) -> Result<(), Self::Error> {
        self.step("register_activity")
    }

    fn process_by_id(&self, process_id: ProcessId) -> Result<Process, Self::Error> {
        self.step("process_by_id")?;
        self.processes
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == Some(process_id))
            .cloned()
            .ok_or_else(|| BackendError::not_found(process_id.to_string()))
    }

    fn processes(&self, workflow: Option<&str>, tag: Option<&str>) -> Result<Vec<Process>, Self::Error> {
        self.step("processes")?;
        Ok(self
            .processes
            .lock()
            .unwrap()
            .iter()
            .filter(|p| workflow.is_none_or(|w| p.workflow == w))
            .filter(|p| tag.is_none_or(|t| p.tags.iter().any(|pt| pt == t)))
            .cloned()
            .collect())
    }

    fn poll_activity_task(
        &self,
        _category: Option<&str>,
        _identity: Option<&str>,
    ) -> Result<Option<ActivityTask>, Self::Error> {
        self.step("poll_activity_task")?;
        Ok(self.activity_tasks.lock().unwrap().pop_front())
    }

    fn poll_decision_task(&self, _identity: Option<&str>) -> Result<Option<DecisionTask>, Self::Error> {
        self.step("poll_decision_task")?;
        Ok(self.decision_tasks.lock().unwrap().pop_front())
    }

    fn heartbeat_activity_task(&self, _task: &ActivityTask) -> Result<(), Self::Error> {
        self.step("heartbeat_activity_task")
    }

    fn start_process(&self, process: &Process) -> Result<ProcessId, Self::Error> {
        self.step("start_process")?;
        let id = ProcessId::new();
        let started = process
            .clone()
            .with_id(id)
            .with_history(vec![HistoryEvent::process_started()]);
        self.processes.lock().unwrap().push(started);
        Ok(id)
    }

    fn signal_process(
        &self,
        _process_id: ProcessId,
        _signal: &str,
        _data: Option<&JsonValue>,
    ) -> Result<(), Self::Error> {
        self.step("signal_process")
    }

    fn cancel_process(&self, _process_id: ProcessId, _details: Option<&str>) -> Result<(), Self::Error> {
        self.step("cancel_process")
    }

    fn complete_decision_task(&self, _task: &DecisionTask, _decisions: &Decisions) -> Result<(), Self::Error> {
        self.step("complete_decision_task")
    }

    fn complete_activity_task(&self, _task: &ActivityTask, _result: &ActivityResult) -> Result<(), Self::Error> {
        self.step("complete_activity_task")
    }
}

/// Everything published on a registry, in publish order.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<(String, WorkflowEvent)>>>,
}

impl EventLog {
    pub fn attach(signals: &Signals) -> Self {
        let log = Self::default();
        let events = log.events.clone();
        signals
            .tap(move |sender, event| {
                events.lock().unwrap().push((sender.to_string(), event.clone()));
                Ok(())
            })
            .unwrap();
        log
    }

    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.events.lock().unwrap().iter().map(|(_, ev)| ev.clone()).collect()
    }

    pub fn senders(&self) -> Vec<String> {
        self.events.lock().unwrap().iter().map(|(s, _)| s.clone()).collect()
    }

    pub fn channels(&self) -> Vec<Channel> {
        self.events.lock().unwrap().iter().map(|(_, ev)| ev.channel()).collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Drain what was recorded so far.
    pub fn take(&self) -> Vec<WorkflowEvent> {
        self.events.lock().unwrap().drain(..).map(|(_, ev)| ev).collect()
    }
}
