//! The keyword library context.
//!
//! [`HttpLibrary`] owns two independent registries, one for REST sessions and
//! one for SOAP clients, plus the configuration and the fault policy. The same
//! alias may name a REST session and a SOAP client at once, and closing the
//! REST sessions leaves SOAP clients alone. A test run creates one library and
//! passes it to every keyword; nothing is kept in globals, so separate runs can
//! use separate libraries on separate threads.

pub mod args;
pub mod keywords;

pub use args::KeywordArgs;
pub use keywords::{KeywordOutput, KeywordSpec, KEYWORDS};

use crate::config::LibraryConfig;
use crate::error::Result;
use crate::models::request::{HttpMethod, RequestOptions};
use crate::models::response::KeywordResponse;
use crate::registry::SessionRegistry;
use crate::rest::{RestSession, SessionOptions};
use crate::soap::{FaultPolicy, SoapCallOptions, SoapClient, SoapResponse, StatusCodePolicy};

/// REST and SOAP keywords over separate alias registries.
pub struct HttpLibrary {
    rest_sessions: SessionRegistry<RestSession>,
    soap_clients: SessionRegistry<SoapClient>,
    config: LibraryConfig,
    fault_policy: Box<dyn FaultPolicy>,
}

impl std::fmt::Debug for HttpLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpLibrary")
            .field("rest_sessions", &self.rest_sessions.aliases())
            .field("soap_clients", &self.soap_clients.aliases())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for HttpLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpLibrary {
    /// Creates a library with default configuration and the status-code
    /// fault policy.
    pub fn new() -> Self {
        Self::with_config(LibraryConfig::default())
    }

    pub fn with_config(config: LibraryConfig) -> Self {
        Self {
            rest_sessions: SessionRegistry::new(),
            soap_clients: SessionRegistry::new(),
            config,
            fault_policy: Box::new(StatusCodePolicy),
        }
    }

    /// Replaces the policy `Call Soap Method` uses to classify faults.
    pub fn with_fault_policy(mut self, policy: impl FaultPolicy + 'static) -> Self {
        self.fault_policy = Box::new(policy);
        self
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Registry of REST sessions.
    pub fn rest_sessions(&self) -> &SessionRegistry<RestSession> {
        &self.rest_sessions
    }

    /// Registry of SOAP clients.
    pub fn soap_clients(&self) -> &SessionRegistry<SoapClient> {
        &self.soap_clients
    }

    /// Creates a REST session and registers it under `alias`.
    pub fn create_rest_session(&mut self, alias: &str, options: SessionOptions) -> Result<()> {
        tracing::info!(alias, "creating REST session");
        let session = RestSession::create(options, &self.config)?;
        self.rest_sessions.register(session, alias);
        Ok(())
    }

    /// Sends a HEAD request; the response has no body.
    pub fn head(&mut self, alias: &str, url: &str, options: RequestOptions) -> Result<KeywordResponse> {
        self.request(HttpMethod::HEAD, alias, url, options)
    }

    pub fn get(&mut self, alias: &str, url: &str, options: RequestOptions) -> Result<KeywordResponse> {
        self.request(HttpMethod::GET, alias, url, options)
    }

    pub fn post(&mut self, alias: &str, url: &str, options: RequestOptions) -> Result<KeywordResponse> {
        self.request(HttpMethod::POST, alias, url, options)
    }

    pub fn put(&mut self, alias: &str, url: &str, options: RequestOptions) -> Result<KeywordResponse> {
        self.request(HttpMethod::PUT, alias, url, options)
    }

    pub fn delete(&mut self, alias: &str, url: &str, options: RequestOptions) -> Result<KeywordResponse> {
        self.request(HttpMethod::DELETE, alias, url, options)
    }

    /// Switches to the REST session `alias` and sends `method` through it.
    pub fn request(
        &mut self,
        method: HttpMethod,
        alias: &str,
        url: &str,
        options: RequestOptions,
    ) -> Result<KeywordResponse> {
        tracing::info!("Sending {} request to: '{}', session: '{}'", method, url, alias);
        let default_timeout = self.config.timeout_duration();
        self.rest_sessions
            .switch(alias)?
            .send(method, url, options, default_timeout)
    }

    /// Drops every REST session. SOAP clients are kept.
    pub fn close_all_sessions(&mut self) {
        tracing::info!(count = self.rest_sessions.len(), "closing all REST sessions");
        self.rest_sessions.empty();
    }

    /// Creates a SOAP client and registers it under `alias`.
    pub fn create_soap_client(
        &mut self,
        alias: &str,
        wsdl: Option<&str>,
        endpoint: Option<&str>,
    ) -> Result<()> {
        tracing::info!(alias, wsdl = wsdl.unwrap_or(""), "creating SOAP client");
        let client = SoapClient::create(wsdl, endpoint, &self.config)?;
        self.soap_clients.register(client, alias);
        Ok(())
    }

    /// Switches to the SOAP client `alias` and calls method `name`.
    pub fn call_soap_method(
        &mut self,
        alias: &str,
        name: &str,
        message: &str,
        options: &SoapCallOptions,
    ) -> Result<SoapResponse> {
        let default_timeout = self.config.soap_timeout_duration();
        let policy = self.fault_policy.as_ref();
        self.soap_clients
            .switch(alias)?
            .call(name, message, options, policy, default_timeout)
    }
}
