//! # errtrack-actix
//!
//! Actix-Web middleware that forwards request errors and handler panics to an
//! error-tracking service.
//!
//! Handlers record non-fatal errors on the request as they go. When the
//! request finishes, the middleware hands each recorded error to a
//! [`Reporter`] at error level. If the handler panicked, the panic is
//! reported at critical level too, always after the recorded errors.
//!
//! ## Two middlewares
//!
//! - [`ErrorReporting`] re-raises the panic with its original payload so an
//!   outer boundary decides the response
//! - [`ErrorRecovery`] stops the panic and answers `500 Internal Server Error`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
//! use errtrack_actix::{Config, ErrorRecovery, RecordErrorExt, TracingReporter};
//!
//! async fn index(req: HttpRequest) -> HttpResponse {
//!     req.record_error_with_meta(std::io::Error::other("cache miss"), "key=home");
//!     HttpResponse::Ok().body("Hello!")
//! }
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     HttpServer::new(|| {
//!         App::new()
//!             .wrap(ErrorRecovery::with_config(
//!                 TracingReporter,
//!                 Config::new(false, true, "x-request-id"),
//!             ))
//!             .route("/", web::get().to(index))
//!     })
//!     .bind("0.0.0.0:8080")?
//!     .run()
//!     .await
//! }
//! ```
//!
//! ## Reports
//!
//! Every report carries an extra-data map with:
//!
//! - `endpoint`: the request path and query
//! - `request_id`: value of the configured header, when one is configured
//! - `meta`: the recorded error's metadata (error-level reports only)
//!
//! Critical reports also carry a stack skip depth of [`STACK_SKIP`].
//!
//! The request id is read from the response headers. Only when there is no
//! response, because the handler panicked, is the request header of the same
//! name used instead.
//!
//! Reporters receive a [`RequestSnapshot`]: an owned copy of the request
//! head taken before the inner service runs.
//!
//! ## Architecture
//!
//! - `middleware`: [`ErrorReporting`], the re-raising variant
//! - `recovery`: [`ErrorRecovery`], the containing variant
//! - `report`: reporting steps shared by both
//! - `record`: recording errors on a request
//! - `reporter`: the [`Reporter`] trait and [`TracingReporter`]
//! - `snapshot`: the request head handed to reporters
//! - `stack`: panic hook recording the panicking thread's backtrace
//! - `config`: middleware options
//! - `error`: error types
//! - `utils`: endpoint and request-id extraction

pub mod config;
pub mod error;
pub mod middleware;
pub mod prelude;
pub mod record;
pub mod recovery;
pub mod report;
pub mod reporter;
pub mod snapshot;
pub mod stack;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{PanicError, RecoveredPanic, ReportError};
pub use middleware::ErrorReporting;
pub use record::{RecordErrorExt, RequestError, RequestErrors};
pub use recovery::ErrorRecovery;
pub use report::STACK_SKIP;
pub use reporter::{Extra, Reporter, TracingReporter};
pub use snapshot::RequestSnapshot;
pub use stack::install_panic_hook;
