//! `flowbus-core`: workflow domain vocabulary and the backend contract.
//!
//! This crate contains **pure domain** types (no IO). Backends implement
//! [`Backend`]; everything else in the workspace only reads these types.

pub mod activity;
pub mod backend;
pub mod decision;
pub mod error;
pub mod history;
pub mod id;
pub mod options;
pub mod process;
pub mod task;

pub use activity::{ActivityExecution, ActivityResult, ResultKind};
pub use backend::Backend;
pub use decision::{Decision, DecisionKind, Decisions};
pub use error::{BackendError, CoreError, CoreResult};
pub use history::HistoryEvent;
pub use id::ProcessId;
pub use options::{ActivityOptions, WorkflowOptions};
pub use process::{Process, ProcessResult};
pub use task::{ActivityTask, DecisionTask};
