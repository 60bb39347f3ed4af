//! The channel registry handed to publishers.
//!
//! `Signals` is a plain value: build one, subscribe to the channels you care
//! about, then share it (`Arc<Signals>`) with every decorator that should
//! publish into it. There is no process-wide registry.

use std::sync::Arc;

use crate::bus::{PublishReport, Signal, SubscriberFailurePolicy, SubscriptionId};
use crate::channel::Channel;
use crate::error::SignalError;
use crate::event::{ChannelEvent, WorkflowEvent};
use crate::records::{
    ActivityCanceled, ActivityCompleted, ActivityFailed, ActivityScheduled, ActivityStarted,
    ActivityTaskCompleted, ActivityTimedOut, DecisionTaskCompleted, ProcessCanceled,
    ProcessCompleted, ProcessSignaled, ProcessStarted,
};

type TapHandler = Arc<dyn Fn(&str, &WorkflowEvent) -> anyhow::Result<()> + Send + Sync>;

/// Subscriptions created by [`Signals::tap`], one per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tap {
    subscriptions: Vec<(Channel, SubscriptionId)>,
}

impl Tap {
    pub fn subscriptions(&self) -> &[(Channel, SubscriptionId)] {
        &self.subscriptions
    }
}

/// Every workflow event channel.
#[derive(Debug)]
pub struct Signals {
    pub process_started: Signal<ProcessStarted>,
    pub process_completed: Signal<ProcessCompleted>,
    pub process_canceled: Signal<ProcessCanceled>,
    pub process_signaled: Signal<ProcessSignaled>,
    pub activity_scheduled: Signal<ActivityScheduled>,
    pub activity_started: Signal<ActivityStarted>,
    pub activity_completed: Signal<ActivityCompleted>,
    pub activity_canceled: Signal<ActivityCanceled>,
    pub activity_failed: Signal<ActivityFailed>,
    pub activity_timedout: Signal<ActivityTimedOut>,
    pub complete_decision_task: Signal<DecisionTaskCompleted>,
    pub complete_activity_task: Signal<ActivityTaskCompleted>,
    policy: SubscriberFailurePolicy,
}

impl Default for Signals {
    fn default() -> Self {
        Self::with_policy(SubscriberFailurePolicy::default())
    }
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry with one subscriber-failure policy for every channel.
    pub fn with_policy(policy: SubscriberFailurePolicy) -> Self {
        Self {
            process_started: Signal::new(Channel::ProcessStarted, policy),
            process_completed: Signal::new(Channel::ProcessCompleted, policy),
            process_canceled: Signal::new(Channel::ProcessCanceled, policy),
            process_signaled: Signal::new(Channel::ProcessSignaled, policy),
            activity_scheduled: Signal::new(Channel::ActivityScheduled, policy),
            activity_started: Signal::new(Channel::ActivityStarted, policy),
            activity_completed: Signal::new(Channel::ActivityCompleted, policy),
            activity_canceled: Signal::new(Channel::ActivityCanceled, policy),
            activity_failed: Signal::new(Channel::ActivityFailed, policy),
            activity_timedout: Signal::new(Channel::ActivityTimedOut, policy),
            complete_decision_task: Signal::new(Channel::CompleteDecisionTask, policy),
            complete_activity_task: Signal::new(Channel::CompleteActivityTask, policy),
            policy,
        }
    }

    /// The subscriber-failure policy every channel was built with.
    pub fn policy(&self) -> SubscriberFailurePolicy {
        self.policy
    }

    /// Publish an event on the channel it belongs to.
    pub fn publish(&self, sender: &str, event: &WorkflowEvent) -> Result<PublishReport, SignalError> {
        match event {
            WorkflowEvent::ProcessStarted(e) => self.process_started.publish(sender, e),
            WorkflowEvent::ProcessCompleted(e) => self.process_completed.publish(sender, e),
            WorkflowEvent::ProcessCanceled(e) => self.process_canceled.publish(sender, e),
            WorkflowEvent::ProcessSignaled(e) => self.process_signaled.publish(sender, e),
            WorkflowEvent::ActivityScheduled(e) => self.activity_scheduled.publish(sender, e),
            WorkflowEvent::ActivityStarted(e) => self.activity_started.publish(sender, e),
            WorkflowEvent::ActivityCompleted(e) => self.activity_completed.publish(sender, e),
            WorkflowEvent::ActivityCanceled(e) => self.activity_canceled.publish(sender, e),
            WorkflowEvent::ActivityFailed(e) => self.activity_failed.publish(sender, e),
            WorkflowEvent::ActivityTimedOut(e) => self.activity_timedout.publish(sender, e),
            WorkflowEvent::CompleteDecisionTask(e) => self.complete_decision_task.publish(sender, e),
            WorkflowEvent::CompleteActivityTask(e) => self.complete_activity_task.publish(sender, e),
        }
    }

    /// Subscribe one handler to every channel.
    ///
    /// The handler sees each event as a [`WorkflowEvent`]; it runs after the
    /// handlers already subscribed to that channel.
    pub fn tap<F>(&self, handler: F) -> Result<Tap, SignalError>
    where
        F: Fn(&str, &WorkflowEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let handler: TapHandler = Arc::new(handler);
        let subscriptions = vec![
            tap_signal(&self.process_started, &handler)?,
            tap_signal(&self.process_completed, &handler)?,
            tap_signal(&self.process_canceled, &handler)?,
            tap_signal(&self.process_signaled, &handler)?,
            tap_signal(&self.activity_scheduled, &handler)?,
            tap_signal(&self.activity_started, &handler)?,
            tap_signal(&self.activity_completed, &handler)?,
            tap_signal(&self.activity_canceled, &handler)?,
            tap_signal(&self.activity_failed, &handler)?,
            tap_signal(&self.activity_timedout, &handler)?,
            tap_signal(&self.complete_decision_task, &handler)?,
            tap_signal(&self.complete_activity_task, &handler)?,
        ];
        Ok(Tap { subscriptions })
    }

    /// Remove a tap. Returns how many channel subscriptions were removed.
    pub fn untap(&self, tap: &Tap) -> Result<usize, SignalError> {
        let mut removed = 0;
        for (channel, id) in &tap.subscriptions {
            if self.unsubscribe(*channel, *id)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Unsubscribe by channel name, for callers that only kept the id.
    pub fn unsubscribe(&self, channel: Channel, id: SubscriptionId) -> Result<bool, SignalError> {
        match channel {
            Channel::ProcessStarted => self.process_started.unsubscribe(id),
            Channel::ProcessCompleted => self.process_completed.unsubscribe(id),
            Channel::ProcessCanceled => self.process_canceled.unsubscribe(id),
            Channel::ProcessSignaled => self.process_signaled.unsubscribe(id),
            Channel::ActivityScheduled => self.activity_scheduled.unsubscribe(id),
            Channel::ActivityStarted => self.activity_started.unsubscribe(id),
            Channel::ActivityCompleted => self.activity_completed.unsubscribe(id),
            Channel::ActivityCanceled => self.activity_canceled.unsubscribe(id),
            Channel::ActivityFailed => self.activity_failed.unsubscribe(id),
            Channel::ActivityTimedOut => self.activity_timedout.unsubscribe(id),
            Channel::CompleteDecisionTask => self.complete_decision_task.unsubscribe(id),
            Channel::CompleteActivityTask => self.complete_activity_task.unsubscribe(id),
        }
    }

    pub fn subscriber_count(&self, channel: Channel) -> usize {
        match channel {
            Channel::ProcessStarted => self.process_started.subscriber_count(),
            Channel::ProcessCompleted => self.process_completed.subscriber_count(),
            Channel::ProcessCanceled => self.process_canceled.subscriber_count(),
            Channel::ProcessSignaled => self.process_signaled.subscriber_count(),
            Channel::ActivityScheduled => self.activity_scheduled.subscriber_count(),
            Channel::ActivityStarted => self.activity_started.subscriber_count(),
            Channel::ActivityCompleted => self.activity_completed.subscriber_count(),
            Channel::ActivityCanceled => self.activity_canceled.subscriber_count(),
            Channel::ActivityFailed => self.activity_failed.subscriber_count(),
            Channel::ActivityTimedOut => self.activity_timedout.subscriber_count(),
            Channel::CompleteDecisionTask => self.complete_decision_task.subscriber_count(),
            Channel::CompleteActivityTask => self.complete_activity_task.subscriber_count(),
        }
    }
}

fn tap_signal<E: ChannelEvent>(
    signal: &Signal<E>,
    handler: &TapHandler,
) -> Result<(Channel, SubscriptionId), SignalError> {
    let handler = handler.clone();
    let id = signal.subscribe(move |sender: &str, event: &E| handler(sender, &event.clone().into_event()))?;
    Ok((E::CHANNEL, id))
}
