//! The contract every workflow backend implements.
//!
//! A backend owns process/activity state, scheduling and history. Callers
//! (workers, deciders, decorators) only reach it through this trait.
//!
//! ## Error Semantics
//!
//! Each backend defines its own `Error`. Wrappers must hand it back to their
//! callers unchanged; [`crate::BackendError`] exists for backends that don't
//! need a custom type.
//!
//! ## Thread Safety
//!
//! The trait requires `Send + Sync`; one backend may serve several workers
//! (or be wrapped by several decorators) at once. Concurrency discipline is the
//! backend's own.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::activity::ActivityResult;
use crate::decision::Decisions;
use crate::id::ProcessId;
use crate::options::{ActivityOptions, WorkflowOptions};
use crate::process::Process;
use crate::task::{ActivityTask, DecisionTask};

pub trait Backend: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn register_workflow(&self, name: &str, options: &WorkflowOptions) -> Result<(), Self::Error>;

    fn register_activity(&self, name: &str, options: &ActivityOptions) -> Result<(), Self::Error>;

    fn process_by_id(&self, process_id: ProcessId) -> Result<Process, Self::Error>;

    /// List processes, optionally filtered by workflow name and/or tag.
    fn processes(&self, workflow: Option<&str>, tag: Option<&str>) -> Result<Vec<Process>, Self::Error>;

    /// Hand out the next activity task, if any.
    fn poll_activity_task(
        &self,
        category: Option<&str>,
        identity: Option<&str>,
    ) -> Result<Option<ActivityTask>, Self::Error>;

    /// Hand out the next decision task, if any.
    ///
    /// The returned process's [`Process::unseen_events`] covers exactly what
    /// the workflow has not decided upon yet.
    fn poll_decision_task(&self, identity: Option<&str>) -> Result<Option<DecisionTask>, Self::Error>;

    fn heartbeat_activity_task(&self, task: &ActivityTask) -> Result<(), Self::Error>;

    /// Start a process and return the id the backend assigned to it.
    fn start_process(&self, process: &Process) -> Result<ProcessId, Self::Error>;

    fn signal_process(
        &self,
        process_id: ProcessId,
        signal: &str,
        data: Option<&JsonValue>,
    ) -> Result<(), Self::Error>;

    fn cancel_process(&self, process_id: ProcessId, details: Option<&str>) -> Result<(), Self::Error>;

    fn complete_decision_task(&self, task: &DecisionTask, decisions: &Decisions) -> Result<(), Self::Error>;

    fn complete_activity_task(&self, task: &ActivityTask, result: &ActivityResult) -> Result<(), Self::Error>;
}

macro_rules! forward_backend {
    ($($ptr:ty),+ $(,)?) => {
        $(
            impl<B> Backend for $ptr
            where
                B: Backend + ?Sized,
            {
                type Error = B::Error;

                fn register_workflow(&self, name: &str, options: &WorkflowOptions) -> Result<(), Self::Error> {
                    (**self).register_workflow(name, options)
                }

                fn register_activity(&self, name: &str, options: &ActivityOptions) -> Result<(), Self::Error> {
                    (**self).register_activity(name, options)
                }

                fn process_by_id(&self, process_id: ProcessId) -> Result<Process, Self::Error> {
                    (**self).process_by_id(process_id)
                }

                fn processes(&self, workflow: Option<&str>, tag: Option<&str>) -> Result<Vec<Process>, Self::Error> {
                    (**self).processes(workflow, tag)
                }

                fn poll_activity_task(
                    &self,
                    category: Option<&str>,
                    identity: Option<&str>,
                ) -> Result<Option<ActivityTask>, Self::Error> {
                    (**self).poll_activity_task(category, identity)
                }

                fn poll_decision_task(&self, identity: Option<&str>) -> Result<Option<DecisionTask>, Self::Error> {
                    (**self).poll_decision_task(identity)
                }

                fn heartbeat_activity_task(&self, task: &ActivityTask) -> Result<(), Self::Error> {
                    (**self).heartbeat_activity_task(task)
                }

                fn start_process(&self, process: &Process) -> Result<ProcessId, Self::Error> {
                    (**self).start_process(process)
                }

                fn signal_process(
                    &self,
                    process_id: ProcessId,
                    signal: &str,
                    data: Option<&JsonValue>,
                ) -> Result<(), Self::Error> {
                    (**self).signal_process(process_id, signal, data)
                }

                fn cancel_process(&self, process_id: ProcessId, details: Option<&str>) -> Result<(), Self::Error> {
                    (**self).cancel_process(process_id, details)
                }

                fn complete_decision_task(&self, task: &DecisionTask, decisions: &Decisions) -> Result<(), Self::Error> {
                    (**self).complete_decision_task(task, decisions)
                }

                fn complete_activity_task(&self, task: &ActivityTask, result: &ActivityResult) -> Result<(), Self::Error> {
                    (**self).complete_activity_task(task, result)
                }
            }
        )+
    };
}

forward_backend!(Arc<B>, &B, Box<B>);
