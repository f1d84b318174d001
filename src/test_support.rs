//! Shared fixtures for the middleware tests

use actix_web::body::{self, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::Next;
use actix_web::web::Bytes;
use actix_web::{test, Error, HttpRequest, HttpResponse};
use futures::FutureExt;
use std::error::Error as StdError;
use std::panic::AssertUnwindSafe;
use std::sync::Mutex;

use crate::error::{RecoveredPanic, ReportError};
use crate::record::RecordErrorExt;
use crate::reporter::{Extra, Reporter};
use crate::snapshot::RequestSnapshot;

#[derive(Debug, thiserror::Error)]
#[error("test error")]
pub struct TestError;

/// One call into the reporter, captured for assertions
#[derive(Debug, Clone)]
pub struct Captured {
    pub message: String,
    pub uri: String,
    pub skip: Option<usize>,
    pub extra: Extra,
}

/// Reporter that stores every report it receives
#[derive(Default)]
pub struct RecordingReporter {
    errors: Mutex<Vec<Captured>>,
    criticals: Mutex<Vec<Captured>>,
    fail: bool,
}

impl RecordingReporter {
    /// Records reports but answers every call with an error
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn errors(&self) -> Vec<Captured> {
        self.errors.lock().unwrap().clone()
    }

    pub fn criticals(&self) -> Vec<Captured> {
        self.criticals.lock().unwrap().clone()
    }

    fn result(&self) -> Result<(), ReportError> {
        if self.fail {
            Err(ReportError::Transport("tracker unreachable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Reporter for RecordingReporter {
    fn report_error(
        &self,
        error: &(dyn StdError + 'static),
        request: &RequestSnapshot,
        extra: Extra,
    ) -> Result<(), ReportError> {
        self.errors.lock().unwrap().push(Captured {
            message: error.to_string(),
            uri: request.uri().to_string(),
            skip: None,
            extra,
        });
        self.result()
    }

    fn report_critical(
        &self,
        error: &(dyn StdError + 'static),
        request: &RequestSnapshot,
        skip: usize,
        extra: Extra,
    ) -> Result<(), ReportError> {
        self.criticals.lock().unwrap().push(Captured {
            message: error.to_string(),
            uri: request.uri().to_string(),
            skip: Some(skip),
            extra,
        });
        self.result()
    }
}

pub async fn errors_then_panic(req: HttpRequest) -> HttpResponse {
    req.record_error_with_meta(TestError, "some data");
    req.record_error_with_meta(TestError, "some data");
    panic!("occurs panic")
}

pub async fn panic_only(_req: HttpRequest) -> HttpResponse {
    panic!("occurs panic")
}

pub async fn errors_then_bad_request(req: HttpRequest) -> HttpResponse {
    req.record_error_with_meta(TestError, "some data");
    req.record_error_with_meta(TestError, "some data");
    HttpResponse::BadRequest().finish()
}

pub async fn quiet(_req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Outermost boundary used in tests: turns an escaped panic into a 500
///
/// Holds no `HttpRequest` clone across the call, so routing below it works.
pub async fn outer_recovery(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    match AssertUnwindSafe(next.call(req)).catch_unwind().await {
        Ok(res) => res.map(ServiceResponse::map_into_boxed_body),
        Err(_) => Err(RecoveredPanic.into()),
    }
}

/// Status and body the client would receive
///
/// A service error is rendered through `error_response`, as the server does.
pub async fn respond<S, R, B>(app: &S, req: R) -> (StatusCode, Bytes)
where
    S: Service<R, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            (status, test::read_body(resp).await)
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let body = body::to_bytes(resp.into_body())
                .await
                .expect("error body should be readable");
            (status, body)
        }
    }
}

/// Checks a captured error-level report for the `GET /` fixtures
pub fn assert_error_report(report: &Captured) {
    assert_eq!(report.message, "test error");
    assert_eq!(report.uri, "/");
    assert_eq!(report.skip, None);
    assert_eq!(report.extra["endpoint"], "/");
    assert_eq!(report.extra["meta"], "some data");
}

/// Checks a captured critical-level report for the `GET /` fixtures
pub fn assert_critical_report(report: &Captured) {
    assert_eq!(report.message, "occurs panic");
    assert_eq!(report.uri, "/");
    assert_eq!(report.skip, Some(3));
    assert_eq!(report.extra["endpoint"], "/");
}
