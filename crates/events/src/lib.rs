//! Workflow event channels (mechanics + typed records).
//!
//! - [`Signal`]: one named channel with synchronous, in-order fan-out
//! - [`Signals`]: the registry of every channel, injected into publishers
//! - [`records`]: one strongly-typed record per channel

pub mod bus;
pub mod channel;
pub mod error;
pub mod event;
pub mod records;
pub mod signals;

pub use bus::{Handler, PublishReport, Signal, SubscriberFailurePolicy, SubscriptionId};
pub use channel::{Channel, UnknownChannel};
pub use error::SignalError;
pub use event::{ChannelEvent, WorkflowEvent};
pub use records::{
    ActivityCanceled, ActivityCompleted, ActivityFailed, ActivityScheduled, ActivityStarted,
    ActivityTaskCompleted, ActivityTimedOut, DecisionTaskCompleted, ProcessCanceled,
    ProcessCompleted, ProcessSignaled, ProcessStarted,
};
pub use signals::{Signals, Tap};
