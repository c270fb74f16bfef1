//! HTTP and SOAP keywords for keyword-driven test runners
//!
//! This crate provides the keyword library a test engine calls to talk to
//! REST and SOAP services: create named sessions, send verbs through them and
//! check SOAP responses against an expected fault outcome.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - **registry**: Alias-keyed store of session handles with a current pointer
//! - **rest**: REST sessions, verb dispatch and multipart uploads
//! - **soap**: SOAP clients, envelope preparation, WSDL lookup and fault policies
//! - **library**: The [`HttpLibrary`] context, keyword catalogue and dispatch
//! - **executor**: Sends prepared requests using reqwest
//! - **models**: Request and response data structures
//! - **xml**: Owned XML trees with a small path language
//! - **config**: Library defaults loaded from JSON settings
//! - **auth**: Basic authentication
//! - **logging**: Optional `tracing` subscriber setup
//!
//! # Sessions
//!
//! REST sessions and SOAP clients live in separate registries, so one alias
//! can name both. Creating a session under an alias that is already taken
//! replaces it; every keyword that takes an alias makes it current before doing
//! its work, and fails with [`KeywordError::AliasNotFound`] when nothing of its
//! kind is registered under it. `Close All Sessions` only closes REST sessions.
//!
//! # Usage
//!
//! ```no_run
//! use http_keywords::{HttpLibrary, RequestOptions, SessionOptions, SoapCallOptions};
//!
//! # fn main() -> http_keywords::Result<()> {
//! let mut library = HttpLibrary::new();
//!
//! library.create_rest_session("api", SessionOptions::new().header("Accept", "application/json"))?;
//! let response = library.get("api", "https://api.example.com/users", RequestOptions::new())?;
//! assert_eq!(response.status, 200);
//!
//! library.create_soap_client("users", None, Some("https://api.example.com/soap"))?;
//! let options = SoapCallOptions::new().replace("_id_", "64");
//! let reply = library.call_soap_method("users", "getUserName", "request.xml", &options)?;
//! println!("{:?}", reply.as_xml().map(|root| root.tag.as_str()));
//!
//! library.close_all_sessions();
//! # Ok(())
//! # }
//! ```
//!
//! Engines that drive keywords by name use [`HttpLibrary::run_keyword`]:
//!
//! ```no_run
//! use http_keywords::{HttpLibrary, KeywordArgs};
//!
//! let mut library = HttpLibrary::new();
//! library
//!     .run_keyword("Create Rest Session", &KeywordArgs::new().arg("api").named("verify", "False"))
//!     .unwrap();
//! let output = library
//!     .run_keyword("Get", &KeywordArgs::new().arg("api").arg("https://api.example.com/users"))
//!     .unwrap();
//! println!("{}", output.to_value());
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod executor;
pub mod library;
pub mod logging;
pub mod models;
pub mod registry;
pub mod rest;
pub mod soap;
pub mod xml;

pub use config::{load_config, load_config_file, LibraryConfig};
pub use error::{KeywordError, Result};
pub use library::{HttpLibrary, KeywordArgs, KeywordOutput, KeywordSpec, KEYWORDS};
pub use models::{HttpMethod, KeywordResponse, RequestOptions, ResponseBody};
pub use registry::SessionRegistry;
pub use rest::multipart::{convert_to_multipart_encoded_files, MultipartFile};
pub use rest::{RestSession, SessionOptions};
pub use soap::{
    EnvelopePolicy, FaultPolicy, SoapCallOptions, SoapClient, SoapResponse, StatusCodePolicy,
};
pub use xml::{NamespaceMode, XmlElement};
