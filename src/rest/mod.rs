//! REST sessions and verb dispatch.
//!
//! A [`RestSession`] wraps a blocking reqwest client configured with the
//! session's default headers, basic auth, TLS verification flag and client
//! certificate. Verbs are sent through it and normalized into
//! [`KeywordResponse`] values.

pub mod multipart;

use crate::auth::BasicAuth;
use crate::config::LibraryConfig;
use crate::error::{KeywordError, Result};
use crate::executor::{execute_request, RequestError};
use crate::models::request::{
    cookie_header, resolve_timeout, HttpMethod, HttpRequest, RequestOptions,
};
use crate::models::response::KeywordResponse;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use std::path::PathBuf;
use std::time::Duration;

/// Arguments of `Create Rest Session`.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Headers sent with every request of the session.
    pub headers: Vec<(String, String)>,
    /// Basic auth credentials.
    pub auth: Option<BasicAuth>,
    /// TLS certificate verification. Falls back to the configured default.
    pub verify: Option<bool>,
    /// PEM file holding the client certificate and its private key.
    pub cert: Option<PathBuf>,
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(BasicAuth::new(username, password));
        self
    }

    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = Some(verify);
        self
    }

    pub fn cert(mut self, cert: impl Into<PathBuf>) -> Self {
        self.cert = Some(cert.into());
        self
    }
}

/// A registered REST session.
#[derive(Debug, Clone)]
pub struct RestSession {
    client: Client,
    verify: bool,
    cert: Option<PathBuf>,
}

impl RestSession {
    /// Builds the session's client.
    ///
    /// # Errors
    ///
    /// `KeywordError::InvalidArgument` for unusable header names or values,
    /// `KeywordError::NotFound` for a missing certificate file and
    /// `KeywordError::Transport` when the certificate cannot be loaded.
    pub fn create(options: SessionOptions, config: &LibraryConfig) -> Result<Self> {
        let verify = options.verify.unwrap_or(config.verify_ssl);
        let default_headers = default_headers(&options)?;

        let mut builder = Client::builder()
            .default_headers(default_headers)
            .danger_accept_invalid_certs(!verify);

        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.as_str());
        }

        if let Some(cert) = &options.cert {
            if !cert.is_file() {
                return Err(KeywordError::NotFound(format!(
                    "Certificate file '{}' not found",
                    cert.display()
                )));
            }
            let pem = std::fs::read(cert).map_err(|e| KeywordError::io(cert.display().to_string(), e))?;
            let identity = reqwest::Identity::from_pem(&pem).map_err(RequestError::from)?;
            builder = builder.identity(identity);
        }

        let client = builder.build().map_err(RequestError::from)?;

        Ok(Self {
            client,
            verify,
            cert: options.cert,
        })
    }

    pub fn verify(&self) -> bool {
        self.verify
    }

    pub fn cert(&self) -> Option<&std::path::Path> {
        self.cert.as_deref()
    }

    /// Sends `method` to `url` and normalizes the response.
    ///
    /// # Errors
    ///
    /// `KeywordError::InvalidArgument` when `options` carry fields the verb
    /// does not take or lack a required body; transport errors pass through.
    pub fn send(
        &self,
        method: HttpMethod,
        url: &str,
        options: RequestOptions,
        default_timeout: Duration,
    ) -> Result<KeywordResponse> {
        let request = build_request(method, url, options, default_timeout)?;
        let response = execute_request(&self.client, &request)?;

        Ok(match method {
            HttpMethod::HEAD => KeywordResponse::head(response),
            _ => KeywordResponse::with_body(response),
        })
    }
}

fn default_headers(options: &SessionOptions) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in &options.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| KeywordError::invalid_argument("headers", format!("invalid header name '{}'", name)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| KeywordError::invalid_argument("headers", format!("invalid value for header '{}'", name)))?;
        headers.insert(header_name, header_value);
    }

    if let Some(auth) = &options.auth {
        let mut value = HeaderValue::from_str(&auth.header_value())
            .map_err(|_| KeywordError::invalid_argument("auth", "credentials are not valid header text"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

/// Checks `options` against the verb's signature and resolves the request.
pub(crate) fn build_request(
    method: HttpMethod,
    url: &str,
    options: RequestOptions,
    default_timeout: Duration,
) -> Result<HttpRequest> {
    if !method.accepts_params() && !options.params.is_empty() {
        return Err(KeywordError::invalid_argument(
            "params",
            format!("{} does not take query parameters", method),
        ));
    }
    if !method.accepts_files() && !options.files.is_empty() {
        return Err(KeywordError::invalid_argument(
            "files",
            format!("{} does not take files", method),
        ));
    }
    if !method.requires_data() && options.data.is_some() {
        return Err(KeywordError::invalid_argument(
            "data",
            format!("{} does not take a body", method),
        ));
    }
    if !options.files.is_empty() && options.data.is_some() {
        return Err(KeywordError::invalid_argument(
            "data",
            "data and files cannot be combined",
        ));
    }
    if method.requires_data() && options.data.is_none() && options.files.is_empty() {
        return Err(KeywordError::invalid_argument(
            "data",
            format!("{} requires data", method),
        ));
    }

    let timeout = resolve_timeout(options.timeout, default_timeout)?;
    let mut request = HttpRequest::new(method, url, timeout);
    request.query = options.params;
    request.headers = options.headers;
    if let Some(cookies) = cookie_header(&options.cookies) {
        request.add_header("Cookie", cookies);
    }
    if let Some(data) = options.data {
        request.set_body(data.into_bytes());
    }
    request.files = options.files;
    Ok(request)
}
