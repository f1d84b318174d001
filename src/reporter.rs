//! Reporting entry points
//!
//! The middleware never talks to an error tracker directly. It calls a
//! [`Reporter`], which wraps whatever client the application uses. Errors
//! recorded on a request go to [`Reporter::report_error`]; caught panics go
//! to [`Reporter::report_critical`].

use serde_json::{Map, Value};
use std::error::Error as StdError;
use std::sync::Arc;

use crate::error::ReportError;
use crate::snapshot::RequestSnapshot;

/// Extra data attached to a single report
pub type Extra = Map<String, Value>;

/// Client side of an error-tracking service
///
/// Implementations should hand the report off quickly: they are called
/// inline on the request's worker. Returned errors are logged by the
/// middleware and never reach the client.
///
/// `request` is a copy of the request head taken before the inner service
/// ran, so it is available even when the handler panicked.
pub trait Reporter: Send + Sync + 'static {
    /// Report a non-fatal error recorded during the request
    fn report_error(
        &self,
        error: &(dyn StdError + 'static),
        request: &RequestSnapshot,
        extra: Extra,
    ) -> Result<(), ReportError>;

    /// Report a panic caught while handling the request
    ///
    /// `skip` is the number of stack frames belonging to the middleware
    /// that a stack-capturing client should drop.
    fn report_critical(
        &self,
        error: &(dyn StdError + 'static),
        request: &RequestSnapshot,
        skip: usize,
        extra: Extra,
    ) -> Result<(), ReportError>;
}

impl<R> Reporter for Arc<R>
where
    R: Reporter + ?Sized,
{
    fn report_error(
        &self,
        error: &(dyn StdError + 'static),
        request: &RequestSnapshot,
        extra: Extra,
    ) -> Result<(), ReportError> {
        (**self).report_error(error, request, extra)
    }

    fn report_critical(
        &self,
        error: &(dyn StdError + 'static),
        request: &RequestSnapshot,
        skip: usize,
        extra: Extra,
    ) -> Result<(), ReportError> {
        (**self).report_critical(error, request, skip, extra)
    }
}

impl<R> Reporter for Box<R>
where
    R: Reporter + ?Sized,
{
    fn report_error(
        &self,
        error: &(dyn StdError + 'static),
        request: &RequestSnapshot,
        extra: Extra,
    ) -> Result<(), ReportError> {
        (**self).report_error(error, request, extra)
    }

    fn report_critical(
        &self,
        error: &(dyn StdError + 'static),
        request: &RequestSnapshot,
        skip: usize,
        extra: Extra,
    ) -> Result<(), ReportError> {
        (**self).report_critical(error, request, skip, extra)
    }
}

/// Reporter that writes every report as a `tracing` event
///
/// Useful in development, or when the log pipeline is the error tracker.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report_error(
        &self,
        error: &(dyn StdError + 'static),
        request: &RequestSnapshot,
        extra: Extra,
    ) -> Result<(), ReportError> {
        let extra = serde_json::to_string(&extra)?;
        tracing::error!(
            severity = "error",
            method = %request.method(),
            endpoint = %request.endpoint(),
            extra = %extra,
            "{}",
            error
        );
        Ok(())
    }

    fn report_critical(
        &self,
        error: &(dyn StdError + 'static),
        request: &RequestSnapshot,
        skip: usize,
        extra: Extra,
    ) -> Result<(), ReportError> {
        let extra = serde_json::to_string(&extra)?;
        tracing::error!(
            severity = "critical",
            method = %request.method(),
            endpoint = %request.endpoint(),
            skip,
            extra = %extra,
            "{}",
            error
        );
        Ok(())
    }
}
