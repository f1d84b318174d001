//! Reporting middleware that re-raises panics
//!
//! [`ErrorReporting`] reports errors recorded on the request and any panic
//! raised by the inner service, then resumes the panic with its original
//! payload. Whatever boundary sits outside (another middleware, the server's
//! worker) decides what the client sees. Use
//! [`ErrorRecovery`](crate::ErrorRecovery) to answer with a 500 here instead.

use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::{ok, FutureExt, LocalBoxFuture, Ready};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::config::Config;
use crate::record::RequestErrors;
use crate::report::{report_panic, report_recorded_errors};
use crate::reporter::Reporter;
use crate::snapshot::RequestSnapshot;
use crate::stack::install_panic_hook;

/// Error-reporting middleware for Actix-Web
///
/// ```rust,no_run
/// use actix_web::App;
/// use errtrack_actix::{Config, ErrorReporting, TracingReporter};
///
/// App::new()
///     .wrap(ErrorReporting::with_config(
///         TracingReporter,
///         Config::new(false, true, "x-request-id"),
///     ));
/// ```
pub struct ErrorReporting {
    reporter: Arc<dyn Reporter>,
    config: Arc<Config>,
}

impl ErrorReporting {
    pub fn new(reporter: impl Reporter) -> Self {
        Self::with_config(reporter, Config::default())
    }

    /// Build with explicit options
    ///
    /// `print_stack` installs the process-wide hook that records where a
    /// panic was raised.
    pub fn with_config(reporter: impl Reporter, config: Config) -> Self {
        if config.print_stack {
            install_panic_hook();
        }
        Self {
            reporter: Arc::new(reporter),
            config: config.into_arc(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ErrorReporting
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorReportingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ErrorReportingService {
            service,
            reporter: Arc::clone(&self.reporter),
            config: Arc::clone(&self.config),
        })
    }
}

pub struct ErrorReportingService<S> {
    service: S,
    reporter: Arc<dyn Reporter>,
    config: Arc<Config>,
}

impl<S, B> Service<ServiceRequest> for ErrorReportingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Owned copies only: routing needs the `HttpRequest` unshared
        let snapshot = RequestSnapshot::from(&req);
        let errors = RequestErrors::attach(&req);
        let reporter = Arc::clone(&self.reporter);
        let config = Arc::clone(&self.config);

        // Inner services may panic while building their future as well as
        // while it is polled
        let fut = panic::catch_unwind(AssertUnwindSafe(|| self.service.call(req)));

        Box::pin(async move {
            let outcome = match fut {
                Ok(fut) => AssertUnwindSafe(fut).catch_unwind().await,
                Err(payload) => Err(payload),
            };

            let response_headers = match &outcome {
                Ok(Ok(res)) => Some(res.headers()),
                _ => None,
            };
            report_recorded_errors(
                reporter.as_ref(),
                &config,
                &snapshot,
                &errors.snapshot(),
                response_headers,
            );

            match outcome {
                Ok(res) => res.map(|res| res.map_into_boxed_body()),
                Err(payload) => {
                    report_panic(reporter.as_ref(), &config, &snapshot, payload.as_ref());
                    panic::resume_unwind(payload)
                }
            }
        })
    }
}
