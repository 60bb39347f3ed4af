//! Registration options for workflows and activities.
//!
//! Timeouts are in seconds; `None` leaves the backend default in place.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowOptions {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub decision_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityOptions {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub scheduled_timeout_secs: Option<u64>,
    #[serde(default)]
    pub execution_timeout_secs: Option<u64>,
    #[serde(default)]
    pub heartbeat_timeout_secs: Option<u64>,
}

impl ActivityOptions {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

impl WorkflowOptions {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}
