//! Event-emitting backend decorator.
//!
//! `EventEmittingBackend` wraps any [`Backend`] and republishes its state
//! changes on a [`Signals`] registry:
//!
//! ```text
//! caller → EventEmittingBackend → inner Backend (delegate)
//!                    ↓ (only if the delegate returned Ok)
//!              derive events → Signals → subscribers
//! ```
//!
//! ## Guarantees
//!
//! - **Pass-through**: return values and failures are the inner backend's,
//!   untouched (`Error = B::Error`)
//! - **Publish after success**: a failed delegate call publishes nothing
//! - **Ordering**: the generic `complete_*` event precedes the events derived
//!   from its payload; decision events follow decision order
//! - **Stateless**: the decorator holds the backend, the registry and its config
//!
//! Subscriber failures (handlers returning `Err`) are governed by the
//! registry's policy and are logged here; they never change what the caller
//! gets back. A panicking handler is outside that policy: the panic unwinds
//! through the decorator after the backend call has already taken effect.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{debug, error, instrument, warn};

use flowbus_core::{
    ActivityOptions, ActivityResult, ActivityTask, Backend, DecisionTask, Decisions, Process,
    ProcessId, WorkflowOptions,
};
use flowbus_events::{
    ActivityTaskCompleted, DecisionTaskCompleted, ProcessCanceled, ProcessSignaled, ProcessStarted,
    Signals, WorkflowEvent,
};

use crate::config::EmitterConfig;
use crate::derive;

#[derive(Debug)]
pub struct EventEmittingBackend<B> {
    inner: B,
    signals: Arc<Signals>,
    config: EmitterConfig,
}

impl<B> EventEmittingBackend<B> {
    pub fn new(inner: B, signals: Arc<Signals>) -> Self {
        let config = EmitterConfig::default().with_subscriber_failure(signals.policy());
        Self::with_config(inner, signals, config)
    }

    /// The registry's policy is the one in force; a config asking for another
    /// is corrected to match it, with a warning.
    pub fn with_config(inner: B, signals: Arc<Signals>, mut config: EmitterConfig) -> Self {
        if config.subscriber_failure != signals.policy() {
            warn!(
                configured = ?config.subscriber_failure,
                in_force = ?signals.policy(),
                "subscriber failure policy differs from the injected registry; use EmitterConfig::build_signals"
            );
            config.subscriber_failure = signals.policy();
        }
        Self {
            inner,
            signals,
            config,
        }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    pub fn signals(&self) -> &Arc<Signals> {
        &self.signals
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    fn emit(&self, event: impl Into<WorkflowEvent>) {
        let event = event.into();
        let sender = self.config.source.as_str();

        match self.signals.publish(sender, &event) {
            Ok(report) if report.is_clean() => {
                debug!(channel = %report.channel, sender, delivered = report.delivered, "event published");
            }
            Ok(report) => {
                warn!(
                    channel = %report.channel,
                    sender,
                    delivered = report.delivered,
                    failed = report.failed,
                    halted = report.halted,
                    "event published with subscriber failures"
                );
            }
            Err(e) => {
                error!(channel = %event.channel(), sender, error = %e, "event not published");
            }
        }
    }
}

impl<B: Backend> Backend for EventEmittingBackend<B> {
    type Error = B::Error;

    fn register_workflow(&self, name: &str, options: &WorkflowOptions) -> Result<(), Self::Error> {
        self.inner.register_workflow(name, options)
    }

    fn register_activity(&self, name: &str, options: &ActivityOptions) -> Result<(), Self::Error> {
        self.inner.register_activity(name, options)
    }

    fn process_by_id(&self, process_id: ProcessId) -> Result<Process, Self::Error> {
        self.inner.process_by_id(process_id)
    }

    fn processes(&self, workflow: Option<&str>, tag: Option<&str>) -> Result<Vec<Process>, Self::Error> {
        self.inner.processes(workflow, tag)
    }

    fn poll_activity_task(
        &self,
        category: Option<&str>,
        identity: Option<&str>,
    ) -> Result<Option<ActivityTask>, Self::Error> {
        self.inner.poll_activity_task(category, identity)
    }

    #[instrument(level = "debug", skip(self), err)]
    fn poll_decision_task(&self, identity: Option<&str>) -> Result<Option<DecisionTask>, Self::Error> {
        let task = self.inner.poll_decision_task(identity)?;

        if self.config.scan_history {
            if let Some(task) = &task {
                for event in derive::poll_events(task) {
                    self.emit(event);
                }
            }
        }

        Ok(task)
    }

    fn heartbeat_activity_task(&self, task: &ActivityTask) -> Result<(), Self::Error> {
        self.inner.heartbeat_activity_task(task)
    }

    #[instrument(level = "debug", skip_all, fields(workflow = %process.workflow), err)]
    fn start_process(&self, process: &Process) -> Result<ProcessId, Self::Error> {
        let process_id = self.inner.start_process(process)?;
        self.emit(ProcessStarted::new(process.clone(), process_id));
        Ok(process_id)
    }

    #[instrument(level = "debug", skip(self, data), err)]
    fn signal_process(
        &self,
        process_id: ProcessId,
        signal: &str,
        data: Option<&JsonValue>,
    ) -> Result<(), Self::Error> {
        self.inner.signal_process(process_id, signal, data)?;
        self.emit(ProcessSignaled::new(process_id, signal, data.cloned()));
        Ok(())
    }

    #[instrument(level = "debug", skip(self), err)]
    fn cancel_process(&self, process_id: ProcessId, details: Option<&str>) -> Result<(), Self::Error> {
        self.inner.cancel_process(process_id, details)?;
        self.emit(ProcessCanceled::new(process_id, details.map(str::to_owned)));
        Ok(())
    }

    #[instrument(
        level = "debug",
        skip_all,
        fields(process_id = %task.process_id, decisions = decisions.len()),
        err
    )]
    fn complete_decision_task(&self, task: &DecisionTask, decisions: &Decisions) -> Result<(), Self::Error> {
        self.inner.complete_decision_task(task, decisions)?;

        self.emit(DecisionTaskCompleted::new(task.clone(), decisions.clone()));
        for decision in decisions {
            match derive::decision_event(task, decision) {
                Some(event) => self.emit(event),
                None => debug!(decision = %decision.kind(), "decision has no channel"),
            }
        }

        Ok(())
    }

    #[instrument(
        level = "debug",
        skip_all,
        fields(process_id = %task.process_id, result = %result.kind()),
        err
    )]
    fn complete_activity_task(&self, task: &ActivityTask, result: &ActivityResult) -> Result<(), Self::Error> {
        self.inner.complete_activity_task(task, result)?;

        self.emit(ActivityTaskCompleted::new(task.clone(), result.clone()));
        self.emit(derive::result_event(task, result));

        Ok(())
    }
}
