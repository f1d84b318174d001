//! Reporting steps shared by both middleware variants
//!
//! Recorded errors are always reported before a caught panic, so error-level
//! reports for a request survive even when it panics afterwards.

use actix_web::http::header::HeaderMap;
use serde_json::Value;
use std::any::Any;

use crate::config::Config;
use crate::error::PanicError;
use crate::record::RequestError;
use crate::reporter::{Extra, Reporter};
use crate::snapshot::RequestSnapshot;
use crate::stack::{describe_panic, take_panic_backtrace};
use crate::utils::request_id;

/// Stack frames dropped from critical reports
pub const STACK_SKIP: usize = 3;

/// Metadata key holding the request URI
pub const ENDPOINT_KEY: &str = "endpoint";

/// Metadata key holding the request id
pub const REQUEST_ID_KEY: &str = "request_id";

/// Metadata key holding a recorded error's own metadata
pub const META_KEY: &str = "meta";

/// Base metadata shared by both report levels
///
/// The request id is read from `id_source`: the response headers when the
/// inner service produced a response, the request headers otherwise.
fn base_extra(config: &Config, request: &RequestSnapshot, id_source: &HeaderMap) -> Extra {
    let mut extra = Extra::new();
    extra.insert(ENDPOINT_KEY.to_string(), Value::String(request.endpoint()));
    if let Some(header) = config.request_id_header() {
        extra.insert(
            REQUEST_ID_KEY.to_string(),
            Value::String(request_id(header, id_source)),
        );
    }
    extra
}

/// Send every recorded error to the reporter, oldest first
///
/// Does nothing when `only_panics` is set. With a `response`, the request id
/// comes from its headers only; a same-named request header is ignored.
/// Without one (the inner service panicked) the request headers are used.
pub(crate) fn report_recorded_errors(
    reporter: &dyn Reporter,
    config: &Config,
    request: &RequestSnapshot,
    recorded: &[RequestError],
    response: Option<&HeaderMap>,
) {
    if config.only_panics || recorded.is_empty() {
        return;
    }

    tracing::debug!(
        count = recorded.len(),
        endpoint = %request.endpoint(),
        "reporting recorded request errors"
    );

    let id_source = response.unwrap_or_else(|| request.headers());
    for entry in recorded {
        let mut extra = base_extra(config, request, id_source);
        extra.insert(META_KEY.to_string(), Value::String(entry.meta_string()));

        if let Err(e) = reporter.report_error(entry.error(), request, extra) {
            tracing::warn!(error = %e, "failed to report request error");
        }
    }
}

/// Report a caught panic at critical level
///
/// With `print_stack` set, the backtrace recorded by the panic hook is
/// written to stderr first.
pub(crate) fn report_panic(
    reporter: &dyn Reporter,
    config: &Config,
    request: &RequestSnapshot,
    payload: &(dyn Any + Send),
) {
    let error = PanicError::from_payload(payload);

    // Always taken, so a trace never outlives the panic it belongs to
    let backtrace = take_panic_backtrace();
    if config.print_stack {
        eprintln!(
            "{}",
            describe_panic(&request.endpoint(), &error, backtrace.as_ref())
        );
    }

    tracing::debug!(
        endpoint = %request.endpoint(),
        panic = %error,
        "reporting caught panic"
    );

    let extra = base_extra(config, request, request.headers());
    if let Err(e) = reporter.report_critical(&error, request, STACK_SKIP, extra) {
        tracing::warn!(error = %e, "failed to report panic");
    }
}
