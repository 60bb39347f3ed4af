//! Signal mechanics: one named channel, many subscribers.
//!
//! A [`Signal`] is the unit of publish/subscribe in this workspace:
//!
//! - **Synchronous**: `publish()` returns only after every current subscriber ran
//! - **Ordered**: subscribers run in subscription order
//! - **No persistence**: events published before a subscription are not replayed
//! - **Fire-and-forget**: nothing is returned to the publisher except a delivery report
//!
//! ## Subscriber Failures
//!
//! Handlers return `anyhow::Result<()>`. A failing handler never turns into a
//! publisher error; what happens to the remaining subscribers is decided by the
//! signal's [`SubscriberFailurePolicy`], and every failure is logged and counted
//! in the [`PublishReport`].
//!
//! ## Re-entrancy
//!
//! `publish()` snapshots the subscriber list and releases the lock before invoking
//! handlers, so a handler may subscribe/unsubscribe (or publish again) without
//! deadlocking. Changes take effect from the next publish.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::channel::Channel;
use crate::error::SignalError;

/// Subscriber callback: `(sender, event)`.
pub type Handler<E> = Arc<dyn Fn(&str, &E) -> anyhow::Result<()> + Send + Sync>;

/// Token returned by [`Signal::subscribe`]; pass it back to unsubscribe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl core::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// What to do with the remaining subscribers once one of them fails.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriberFailurePolicy {
    /// Log the failure and keep delivering to the others.
    #[default]
    Isolate,
    /// Log the failure and stop delivering this event on this channel.
    Halt,
}

/// Outcome of one `publish()` call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub channel: Channel,
    /// Handlers that returned `Ok`.
    pub delivered: usize,
    /// Handlers that returned `Err`.
    pub failed: usize,
    /// Delivery stopped early under [`SubscriberFailurePolicy::Halt`].
    pub halted: bool,
}

impl PublishReport {
    fn new(channel: Channel) -> Self {
        Self {
            channel,
            delivered: 0,
            failed: 0,
            halted: false,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// One event channel with synchronous fan-out to its subscribers.
pub struct Signal<E> {
    channel: Channel,
    policy: SubscriberFailurePolicy,
    next_id: AtomicU64,
    subscribers: RwLock<Vec<(SubscriptionId, Handler<E>)>>,
}

impl<E> core::fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Signal")
            .field("channel", &self.channel)
            .field("policy", &self.policy)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<E> Signal<E> {
    pub fn new(channel: Channel, policy: SubscriberFailurePolicy) -> Self {
        Self {
            channel,
            policy,
            next_id: AtomicU64::new(1),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn policy(&self) -> SubscriberFailurePolicy {
        self.policy
    }

    /// Register a handler; it runs after every handler registered before it.
    pub fn subscribe<F>(&self, handler: F) -> Result<SubscriptionId, SignalError>
    where
        F: Fn(&str, &E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.subscribe_handler(Arc::new(handler))
    }

    pub fn subscribe_handler(&self, handler: Handler<E>) -> Result<SubscriptionId, SignalError> {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut subs = self.subscribers.write().map_err(|_| self.poisoned())?;
        subs.push((id, handler));
        Ok(id)
    }

    /// Remove a handler. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<bool, SignalError> {
        let mut subs = self.subscribers.write().map_err(|_| self.poisoned())?;
        let before = subs.len();
        subs.retain(|(sub_id, _)| *sub_id != id);
        Ok(subs.len() != before)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().map(|subs| subs.len()).unwrap_or(0)
    }

    /// Deliver `event` to every current subscriber, in subscription order.
    pub fn publish(&self, sender: &str, event: &E) -> Result<PublishReport, SignalError> {
        let snapshot: Vec<(SubscriptionId, Handler<E>)> = {
            let subs = self.subscribers.read().map_err(|_| self.poisoned())?;
            subs.clone()
        };

        let mut report = PublishReport::new(self.channel);
        for (id, handler) in snapshot {
            match handler(sender, event) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    error!(
                        channel = %self.channel,
                        sender,
                        subscription = %id,
                        error = %e,
                        "subscriber failed"
                    );
                    if self.policy == SubscriberFailurePolicy::Halt {
                        report.halted = true;
                        break;
                    }
                }
            }
        }

        Ok(report)
    }

    fn poisoned(&self) -> SignalError {
        SignalError::Poisoned {
            channel: self.channel,
        }
    }
}
