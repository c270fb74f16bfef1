//! HTTP request executor.
//!
//! Sends a resolved [`HttpRequest`] through a session's blocking reqwest client
//! and captures the complete response. Every call blocks until the response
//! body has been read or the request's timeout expires; a timeout is reported
//! as [`RequestError::Timeout`] and never retried.

pub mod error;

pub use error::RequestError;

use crate::models::request::HttpRequest;
use crate::models::response::HttpResponse;
use crate::rest::multipart;
use reqwest::blocking::Client;
use std::time::Instant;

/// Executes an HTTP request with the given client and returns the response.
///
/// Session defaults (headers, auth, TLS settings) come from `client`; the
/// request's own headers replace defaults with the same name.
///
/// # Errors
///
/// Returns `RequestError::InvalidUrl` for unparseable URLs,
/// `RequestError::Timeout` when the deadline passes, and the other variants for
/// connection, TLS and body failures.
pub fn execute_request(client: &Client, request: &HttpRequest) -> Result<HttpResponse, RequestError> {
    let url = url::Url::parse(&request.url)?;
    let start_time = Instant::now();

    let mut req_builder = client
        .request(request.method.to_reqwest(), url)
        .timeout(request.timeout);

    if !request.query.is_empty() {
        req_builder = req_builder.query(&request.query);
    }

    for (name, value) in &request.headers {
        req_builder = req_builder.header(name.as_str(), value.as_str());
    }

    if !request.files.is_empty() {
        // Files are opened and read here and closed before the request is sent.
        let form = multipart::build_form(&request.files)?;
        req_builder = req_builder.multipart(form);
    } else if let Some(body) = &request.body {
        req_builder = req_builder.body(body.clone());
    }

    let response = req_builder.send().map_err(RequestError::from)?;

    let mut http_response = HttpResponse::new(response.status().as_u16());

    for (name, value) in response.headers() {
        if let Ok(value_str) = value.to_str() {
            http_response.add_header(name.as_str(), value_str);
        }
    }

    let body = response.bytes().map_err(RequestError::from)?;
    http_response.set_body(body.to_vec());

    tracing::debug!(
        method = %request.method,
        url = %request.url,
        status = http_response.status_code,
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "request completed"
    );

    Ok(http_response)
}
