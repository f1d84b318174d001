//! Convenience re-exports for easy importing
//!
//! Import everything you need with:
//! ```rust
//! use errtrack_actix::prelude::*;
//! ```

pub use crate::config::Config;
pub use crate::error::{PanicError, RecoveredPanic, ReportError};
pub use crate::middleware::ErrorReporting;
pub use crate::record::RecordErrorExt;
pub use crate::recovery::ErrorRecovery;
pub use crate::reporter::{Extra, Reporter, TracingReporter};
pub use crate::snapshot::RequestSnapshot;
