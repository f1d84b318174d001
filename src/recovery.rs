//! Reporting middleware that contains panics
//!
//! [`ErrorRecovery`] reports exactly like [`ErrorReporting`](crate::ErrorReporting)
//! but stops a caught panic here. The request completes with
//! [`RecoveredPanic`], which the server renders as
//! `500 Internal Server Error` with an empty body. Nothing outside the
//! middleware sees the panic.

use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::{ok, FutureExt, LocalBoxFuture, Ready};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::config::Config;
use crate::error::RecoveredPanic;
use crate::record::RequestErrors;
use crate::report::{report_panic, report_recorded_errors};
use crate::reporter::Reporter;
use crate::snapshot::RequestSnapshot;
use crate::stack::install_panic_hook;

/// Error-reporting middleware that recovers from panics
///
/// ```rust,no_run
/// use actix_web::App;
/// use errtrack_actix::{ErrorRecovery, TracingReporter};
///
/// App::new().wrap(ErrorRecovery::new(TracingReporter));
/// ```
pub struct ErrorRecovery {
    reporter: Arc<dyn Reporter>,
    config: Arc<Config>,
}

impl ErrorRecovery {
    pub fn new(reporter: impl Reporter) -> Self {
        Self::with_config(reporter, Config::default())
    }

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

impl<S, B> Transform<S, ServiceRequest> for ErrorRecovery
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorRecoveryService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ErrorRecoveryService {
            service,
            reporter: Arc::clone(&self.reporter),
            config: Arc::clone(&self.config),
        })
    }
}

pub struct ErrorRecoveryService<S> {
    service: S,
    reporter: Arc<dyn Reporter>,
    config: Arc<Config>,
}

impl<S, B> Service<ServiceRequest> for ErrorRecoveryService<S>
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
        let snapshot = RequestSnapshot::from(&req);
        let errors = RequestErrors::attach(&req);
        let reporter = Arc::clone(&self.reporter);
        let config = Arc::clone(&self.config);

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
                    Err(RecoveredPanic.into())
                }
            }
        })
    }
}
