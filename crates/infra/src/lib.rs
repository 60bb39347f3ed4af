//! Infrastructure layer: the event-emitting backend decorator and its wiring.

pub mod config;
pub mod derive;
pub mod emitter;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, EmitterConfig};
pub use emitter::EventEmittingBackend;
