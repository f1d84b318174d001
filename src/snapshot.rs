//! Owned copy of the request parts that reports need
//!
//! The middleware cannot keep an `HttpRequest` clone across the inner call:
//! routing needs exclusive access to it. A [`RequestSnapshot`] is taken
//! before the call instead and handed to the [`Reporter`](crate::Reporter).

use actix_web::dev::{RequestHead, ServiceRequest};
use actix_web::http::header::HeaderMap;
use actix_web::http::{Method, Uri, Version};
use actix_web::HttpRequest;

#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
}

impl RequestSnapshot {
    pub fn from_head(head: &RequestHead) -> Self {
        Self {
            method: head.method.clone(),
            uri: head.uri.clone(),
            version: head.version,
            headers: head.headers().clone(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Path and query as the client sent them
    pub fn endpoint(&self) -> String {
        crate::utils::endpoint(&self.uri)
    }
}

impl From<&ServiceRequest> for RequestSnapshot {
    fn from(req: &ServiceRequest) -> Self {
        Self::from_head(req.head())
    }
}

impl From<&HttpRequest> for RequestSnapshot {
    fn from(req: &HttpRequest) -> Self {
        Self::from_head(req.head())
    }
}
