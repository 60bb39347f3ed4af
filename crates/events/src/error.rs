use thiserror::Error;

use crate::channel::Channel;

/// Signal registry operation error.
///
/// Subscriber failures are not errors at this level; they are governed by
/// [`crate::SubscriberFailurePolicy`] and counted in [`crate::PublishReport`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The subscriber list lock was poisoned by a panicking handler.
    #[error("subscriber registry for `{channel}` is poisoned")]
    Poisoned { channel: Channel },
}
