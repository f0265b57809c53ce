//! Absolute URIs for the resources this service exposes.
//!
//! `Location` and `Content-Location` headers carry absolute URIs built from
//! the scheme and authority the client used to reach us.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderValue};
use std::convert::Infallible;

use crate::routes;

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const DEFAULT_SCHEME: &str = "http";
const DEFAULT_AUTHORITY: &str = "localhost";

/// Derive `scheme://authority` from an inbound request
///
/// Scheme: `X-Forwarded-Proto` when it names `http` or `https`, then the
/// request URI's scheme, then `http`.
/// Authority: the request URI's authority, then `Host`, then `localhost`.
pub fn base_uri(parts: &Parts) -> String {
    let scheme = parts
        .headers
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| web_scheme(v))
        .or_else(|| parts.uri.scheme_str())
        .unwrap_or(DEFAULT_SCHEME);

    let authority = parts
        .uri
        .authority()
        .map(|a| a.as_str())
        .or_else(|| {
            parts
                .headers
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
        })
        .unwrap_or(DEFAULT_AUTHORITY);

    format!("{}://{}", scheme, authority)
}

/// Canonical form of a forwarded scheme, if it is `http` or `https`
fn web_scheme(proto: &str) -> Option<&'static str> {
    let proto = proto.trim();
    if proto.eq_ignore_ascii_case("https") {
        Some("https")
    } else if proto.eq_ignore_ascii_case("http") {
        Some("http")
    } else {
        None
    }
}

/// Base URI of the current request, as an axum extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUri(pub String);

impl BaseUri {
    /// Absolute URI of a single employee
    pub fn employee(&self, id: i64) -> String {
        format!("{}{}/{}", self.0, routes::EMPLOYEES, id)
    }

    /// Same as [`BaseUri::employee`], as a header value
    pub fn employee_header(&self, id: i64) -> HeaderValue {
        let uri = self.employee(id);
        HeaderValue::try_from(uri).unwrap_or_else(|_| HeaderValue::from_static("/"))
    }
}

impl<S> FromRequestParts<S> for BaseUri
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(BaseUri(base_uri(parts)))
    }
}
