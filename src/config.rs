//! Configuration for the reporting middleware
//!
//! Both [`ErrorReporting`](crate::ErrorReporting) and
//! [`ErrorRecovery`](crate::ErrorRecovery) take the same three options at
//! construction time. The crate never reads files or environment variables;
//! hosts that keep settings on disk can embed [`Config`] in their own
//! settings struct since it implements `Deserialize`.

use serde::Deserialize;
use std::sync::Arc;

/// Options controlling what gets reported and how
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report only panics; errors recorded on the request are dropped
    pub only_panics: bool,

    /// Print a backtrace to stderr when a panic is caught
    pub print_stack: bool,

    /// Header holding the request id to attach to reports (empty disables)
    pub request_id_header: String,
}

impl Config {
    pub fn new(only_panics: bool, print_stack: bool, request_id_header: impl Into<String>) -> Self {
        Self {
            only_panics,
            print_stack,
            request_id_header: request_id_header.into(),
        }
    }

    /// Header name to read the request id from, if one is configured
    pub fn request_id_header(&self) -> Option<&str> {
        if self.request_id_header.is_empty() {
            None
        } else {
            Some(&self.request_id_header)
        }
    }

    /// Wrap config in Arc for sharing between worker services
    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}
