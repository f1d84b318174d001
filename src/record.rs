//! Errors recorded against a request
//!
//! Handlers and inner middleware call [`RecordErrorExt::record_error`] to
//! attach a non-fatal error to the current request without changing its
//! response. The entries live in the request extensions and are read by the
//! reporting middleware once the inner service has finished.

use actix_web::HttpMessage;
use serde_json::Value;
use std::cell::RefCell;
use std::error::Error as StdError;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// A single recorded error and the metadata supplied with it
#[derive(Clone)]
pub struct RequestError {
    error: Arc<dyn StdError + Send + Sync>,
    meta: Value,
}

impl RequestError {
    pub fn new<E>(error: E, meta: Value) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            error: Arc::new(error),
            meta,
        }
    }

    pub fn error(&self) -> &(dyn StdError + 'static) {
        &*self.error
    }

    pub fn meta(&self) -> &Value {
        &self.meta
    }

    /// Metadata as it appears in reports.
    ///
    /// JSON strings are unquoted, everything else is compact JSON.
    pub fn meta_string(&self) -> String {
        match &self.meta {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Debug for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestError")
            .field("error", &self.error.to_string())
            .field("meta", &self.meta)
            .finish()
    }
}

/// Shared handle to the ordered list of errors recorded on a request
///
/// The handle lives in the request extensions. The middleware keeps its own
/// clone, so the entries stay reachable after a panic has dropped the
/// request.
#[derive(Debug, Clone, Default)]
pub struct RequestErrors(Rc<RefCell<Vec<RequestError>>>);

impl RequestErrors {
    /// Handle stored on `msg`, inserting an empty one if there is none yet
    pub fn attach<T: HttpMessage>(msg: &T) -> Self {
        let mut extensions = msg.extensions_mut();
        if let Some(errors) = extensions.get::<RequestErrors>() {
            return errors.clone();
        }
        let errors = RequestErrors::default();
        extensions.insert(errors.clone());
        errors
    }

    pub fn push(&self, entry: RequestError) {
        self.0.borrow_mut().push(entry);
    }

    /// Copy of the entries, oldest first
    pub fn snapshot(&self) -> Vec<RequestError> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

/// Record errors on any actix request type
///
/// ```rust,no_run
/// use actix_web::{HttpRequest, HttpResponse};
/// use errtrack_actix::RecordErrorExt;
///
/// async fn upload(req: HttpRequest) -> HttpResponse {
///     let err = std::io::Error::other("disk quota exceeded");
///     req.record_error_with_meta(err, "user 42");
///     HttpResponse::BadRequest().finish()
/// }
/// ```
pub trait RecordErrorExt {
    /// Record an error without metadata
    fn record_error<E>(&self, error: E)
    where
        E: StdError + Send + Sync + 'static,
    {
        self.record_error_with_meta(error, Value::Null);
    }

    /// Record an error together with metadata
    fn record_error_with_meta<E, M>(&self, error: E, meta: M)
    where
        E: StdError + Send + Sync + 'static,
        M: Into<Value>;

    /// Snapshot of the errors recorded so far, oldest first
    fn recorded_errors(&self) -> Vec<RequestError>;
}

impl<T> RecordErrorExt for T
where
    T: HttpMessage,
{
    fn record_error_with_meta<E, M>(&self, error: E, meta: M)
    where
        E: StdError + Send + Sync + 'static,
        M: Into<Value>,
    {
        RequestErrors::attach(self).push(RequestError::new(error, meta.into()));
    }

    fn recorded_errors(&self) -> Vec<RequestError> {
        self.extensions()
            .get::<RequestErrors>()
            .map(RequestErrors::snapshot)
            .unwrap_or_default()
    }
}
