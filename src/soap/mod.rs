//! SOAP clients and calls.
//!
//! A [`SoapClient`] is a session with TLS verification disabled, optional WSDL
//! text and an optional endpoint. A call resolves the envelope, substitutes
//! placeholders, looks up the SOAPAction, POSTs the envelope and checks the
//! outcome against the caller's fault expectation.

pub mod fault;
pub mod message;
pub mod wsdl;

pub use fault::{EnvelopePolicy, FaultPolicy, StatusCodePolicy};

use crate::config::LibraryConfig;
use crate::error::{KeywordError, Result};
use crate::executor::{execute_request, RequestError};
use crate::models::request::{resolve_timeout, HttpMethod, HttpRequest};
use crate::xml::XmlElement;
use reqwest::blocking::Client;
use std::time::Duration;

/// Headers sent with every SOAP call, in addition to `SOAPAction`.
const SOAP_HEADERS: [(&str, &str); 3] = [
    ("Accept-Encoding", "gzip,deflate"),
    ("Content-Type", "text/xml;charset=UTF-8"),
    ("Connection", "Keep-Alive"),
];

/// A registered SOAP client.
#[derive(Debug, Clone)]
pub struct SoapClient {
    client: Client,
    wsdl: Option<String>,
    endpoint: Option<String>,
}

/// Arguments of `Call Soap Method` beyond alias, method name and message.
#[derive(Debug, Clone)]
pub struct SoapCallOptions {
    /// Literal `old -> new` substitutions applied to the message, in order.
    pub replace: Vec<(String, String)>,
    /// Endpoint used for this call only; the client's endpoint is unchanged.
    pub endpoint: Option<String>,
    /// Whether the caller expects the server to answer with a fault.
    pub expect_fault: bool,
    /// Return a parsed tree (`true`) or the raw response text (`false`).
    pub as_xml: bool,
    /// Response timeout. Falls back to the configured SOAP timeout.
    pub timeout: Option<Duration>,
}

impl Default for SoapCallOptions {
    fn default() -> Self {
        Self {
            replace: Vec::new(),
            endpoint: None,
            expect_fault: false,
            as_xml: true,
            timeout: None,
        }
    }
}

impl SoapCallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.replace.push((old.into(), new.into()));
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn expect_fault(mut self, expect_fault: bool) -> Self {
        self.expect_fault = expect_fault;
        self
    }

    pub fn as_xml(mut self, as_xml: bool) -> Self {
        self.as_xml = as_xml;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Result of a SOAP call.
#[derive(Debug, Clone, PartialEq)]
pub enum SoapResponse {
    /// Parsed response, tags in Clark notation.
    Xml(XmlElement),
    /// Response body as text.
    Text(String),
}

impl SoapResponse {
    pub fn as_xml(&self) -> Option<&XmlElement> {
        match self {
            SoapResponse::Xml(root) => Some(root),
            SoapResponse::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SoapResponse::Xml(_) => None,
            SoapResponse::Text(text) => Some(text),
        }
    }
}

impl SoapClient {
    /// Creates a client, loading the WSDL when one is given.
    ///
    /// # Errors
    ///
    /// See [`wsdl::load_wsdl`]; client construction failures surface as
    /// `KeywordError::Transport`.
    pub fn create(wsdl: Option<&str>, endpoint: Option<&str>, config: &LibraryConfig) -> Result<Self> {
        let mut builder = Client::builder().danger_accept_invalid_certs(true);
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        let client = builder.build().map_err(RequestError::from)?;

        let wsdl = match wsdl {
            Some(location) if !location.is_empty() => Some(wsdl::load_wsdl(
                &client,
                location,
                config.wsdl_timeout_duration(),
            )?),
            _ => None,
        };

        Ok(Self {
            client,
            wsdl,
            endpoint: endpoint.filter(|e| !e.is_empty()).map(str::to_string),
        })
    }

    pub fn wsdl(&self) -> Option<&str> {
        self.wsdl.as_deref()
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// The SOAPAction for `method`: looked up in the WSDL, empty without one.
    pub fn soap_action(&self, method: &str) -> Result<String> {
        match &self.wsdl {
            Some(wsdl) => wsdl::soap_action(wsdl, method),
            None => Ok(String::new()),
        }
    }

    /// Builds the HTTP request for a call without sending it.
    pub fn prepare(
        &self,
        method: &str,
        message: &str,
        options: &SoapCallOptions,
        default_timeout: Duration,
    ) -> Result<HttpRequest> {
        let endpoint = options
            .endpoint
            .as_deref()
            .or(self.endpoint.as_deref())
            .ok_or_else(|| {
                KeywordError::invalid_argument(
                    "endpoint",
                    "no endpoint set on the client or passed to the call",
                )
            })?;

        let envelope = message::apply_replacements(&message::resolve_message(message)?, &options.replace);
        let action = self.soap_action(method)?;

        let timeout = resolve_timeout(options.timeout, default_timeout)?;
        let mut request = HttpRequest::new(HttpMethod::POST, endpoint, timeout);
        for (name, value) in SOAP_HEADERS {
            request.add_header(name, value);
        }
        request.add_header("SOAPAction", action);
        request.set_body(envelope.into_bytes());
        Ok(request)
    }

    /// Calls `method` and checks the outcome against `options.expect_fault`.
    ///
    /// # Errors
    ///
    /// `KeywordError::FaultExpectationMismatch` when the policy's verdict
    /// disagrees with the expectation; `KeywordError::MalformedInput` when the
    /// response is not UTF-8, or not XML while `as_xml` is set; transport
    /// errors pass through.
    pub fn call(
        &self,
        method: &str,
        message: &str,
        options: &SoapCallOptions,
        policy: &dyn FaultPolicy,
        default_timeout: Duration,
    ) -> Result<SoapResponse> {
        let request = self.prepare(method, message, options, default_timeout)?;
        tracing::info!(method, endpoint = %request.url, "executing SOAP method");
        tracing::debug!(action = request.header("SOAPAction").unwrap_or(""), "SOAP action resolved");

        let response = execute_request(&self.client, &request)?;
        let status = response.status_code;
        let body = String::from_utf8(response.body).map_err(|_| {
            KeywordError::MalformedInput(format!("Response of '{}' is not valid UTF-8", method))
        })?;

        let is_fault = policy.is_fault(status, &body);
        if is_fault != options.expect_fault {
            return Err(KeywordError::FaultExpectationMismatch {
                expected_fault: options.expect_fault,
                status,
            });
        }

        if options.as_xml {
            let root = XmlElement::parse(&body).map_err(|e| {
                KeywordError::MalformedInput(format!("Response of '{}' is not XML: {}", method, e))
            })?;
            Ok(SoapResponse::Xml(root))
        } else {
            Ok(SoapResponse::Text(body))
        }
    }
}
