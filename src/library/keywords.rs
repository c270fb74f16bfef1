//! Keyword catalogue and dispatch.
//!
//! A host test engine discovers the library through [`HttpLibrary::keyword_names`],
//! [`HttpLibrary::keyword_arguments`] and [`HttpLibrary::keyword_documentation`],
//! then invokes keywords by name with [`HttpLibrary::run_keyword`]. Names match
//! ignoring case, spaces and underscores, so `Create Rest Session`,
//! `create_rest_session` and `CREATE REST SESSION` are the same keyword.

use super::args::{BoundArgs, KeywordArgs};
use super::HttpLibrary;
use crate::error::{KeywordError, Result};
use crate::models::request::{HttpMethod, RequestOptions};
use crate::models::response::{KeywordResponse, ResponseBody};
use crate::rest::multipart::{convert_to_multipart_encoded_files, MultipartFile};
use crate::rest::SessionOptions;
use crate::soap::{SoapCallOptions, SoapResponse};
use serde_json::{json, Map, Value};

/// Identifies the operation behind a catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordId {
    CreateRestSession,
    Verb(HttpMethod),
    CloseAllSessions,
    ConvertToMultipartEncodedFiles,
    CreateSoapClient,
    CallSoapMethod,
}

/// One keyword as presented to the host engine.
#[derive(Debug, Clone, Copy)]
pub struct KeywordSpec {
    pub id: KeywordId,
    /// Display name.
    pub name: &'static str,
    /// Parameters in order; `name=default` marks an optional one.
    pub args: &'static [&'static str],
    pub doc: &'static str,
}

/// Every keyword the library exposes.
pub static KEYWORDS: [KeywordSpec; 10] = [
    KeywordSpec {
        id: KeywordId::CreateRestSession,
        name: "Create Rest Session",
        args: &["alias", "headers=None", "auth=None", "verify=False", "cert=None"],
        doc: "Creates a REST session registered under `alias`.\n\n\
              `headers` are sent with every request, `auth` is a `[username, password]` \
              pair for basic auth, `verify` toggles TLS certificate verification and \
              `cert` names a PEM file with the client certificate and key. Creating a \
              session under an existing alias replaces it.",
    },
    KeywordSpec {
        id: KeywordId::Verb(HttpMethod::HEAD),
        name: "Head",
        args: &["alias", "url", "params=None", "headers=None", "cookies=None", "timeout=10"],
        doc: "Sends a HEAD request through the session `alias`.\n\n\
              Returns `status` and `headers`; there is no body.",
    },
    KeywordSpec {
        id: KeywordId::Verb(HttpMethod::GET),
        name: "Get",
        args: &["alias", "url", "params=None", "headers=None", "cookies=None", "timeout=10"],
        doc: "Sends a GET request through the session `alias`.\n\n\
              Returns `status`, `headers` and `body`. The body is decoded JSON when \
              the payload parses as JSON and the raw bytes otherwise.",
    },
    KeywordSpec {
        id: KeywordId::Verb(HttpMethod::POST),
        name: "Post",
        args: &["alias", "url", "data=None", "headers=None", "cookies=None", "files=None", "timeout=10"],
        doc: "Sends a POST request through the session `alias`.\n\n\
              Exactly one of `data` (text) and `files` (see Convert To Multipart \
              Encoded Files) must be given.",
    },
    KeywordSpec {
        id: KeywordId::Verb(HttpMethod::PUT),
        name: "Put",
        args: &["alias", "url", "data", "headers=None", "cookies=None", "timeout=10"],
        doc: "Sends a PUT request with the text body `data` through the session `alias`.",
    },
    KeywordSpec {
        id: KeywordId::Verb(HttpMethod::DELETE),
        name: "Delete",
        args: &["alias", "url", "data", "headers=None", "cookies=None", "timeout=10"],
        doc: "Sends a DELETE request with the text body `data` through the session `alias`.",
    },
    KeywordSpec {
        id: KeywordId::CloseAllSessions,
        name: "Close All Sessions",
        args: &[],
        doc: "Closes every REST session and forgets their aliases. SOAP clients are kept.",
    },
    KeywordSpec {
        id: KeywordId::ConvertToMultipartEncodedFiles,
        name: "Convert To Multipart Encoded Files",
        args: &["files"],
        doc: "Turns a list of `[field name, file path, mime type]` entries into \
              multipart file descriptors for the `files` argument of Post.",
    },
    KeywordSpec {
        id: KeywordId::CreateSoapClient,
        name: "Create Soap Client",
        args: &["alias", "wsdl=None", "endpoint=None"],
        doc: "Creates a SOAP client registered under `alias`.\n\n\
              `wsdl` is a URL or file path; it is only used to look up SOAPAction \
              values. `endpoint` is the URL calls are posted to.",
    },
    KeywordSpec {
        id: KeywordId::CallSoapMethod,
        name: "Call Soap Method",
        args: &["alias", "name", "message", "replace=None", "endpoint=None", "expect_fault=False", "xml=True", "timeout=30"],
        doc: "Calls SOAP method `name` through the client `alias`.\n\n\
              `message` is an XML envelope or the path of a file holding one. Each \
              `replace` entry substitutes literal text in the envelope. `endpoint` \
              overrides the client's endpoint for this call only. The keyword fails \
              when the fault outcome differs from `expect_fault`. Returns the parsed \
              response when `xml` is true and the response text otherwise.",
    },
];

/// Lowercases `name` and drops spaces and underscores.
pub fn normalize_keyword_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != ' ' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Looks a keyword up by any spelling of its name.
pub fn find_keyword(name: &str) -> Option<&'static KeywordSpec> {
    let wanted = normalize_keyword_name(name);
    KEYWORDS
        .iter()
        .find(|spec| normalize_keyword_name(spec.name) == wanted)
}

/// What a keyword returns to the host engine.
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordOutput {
    None,
    Response(KeywordResponse),
    Files(Vec<MultipartFile>),
    Soap(SoapResponse),
}

impl KeywordOutput {
    /// Renders the output as a JSON value for engines that only speak JSON.
    ///
    /// Raw bodies become text when they are UTF-8 and a list of byte values
    /// otherwise. Multipart descriptors use the object form accepted back by
    /// Post's `files` argument.
    pub fn to_value(&self) -> Value {
        match self {
            KeywordOutput::None => Value::Null,
            KeywordOutput::Response(response) => {
                let headers: Map<String, Value> = response
                    .headers
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect();
                let mut object = Map::new();
                object.insert("status".to_string(), json!(response.status));
                object.insert("headers".to_string(), Value::Object(headers));
                if let Some(body) = &response.body {
                    let body = match body {
                        ResponseBody::Json(value) => value.clone(),
                        ResponseBody::Raw(bytes) => match std::str::from_utf8(bytes) {
                            Ok(text) => Value::String(text.to_string()),
                            Err(_) => json!(bytes),
                        },
                    };
                    object.insert("body".to_string(), body);
                }
                Value::Object(object)
            }
            KeywordOutput::Files(files) => Value::Array(
                files
                    .iter()
                    .map(|file| {
                        json!({
                            "fieldName": file.field_name,
                            "fileName": file.file_name,
                            "path": file.path.to_string_lossy(),
                            "mimeType": file.mime_type,
                        })
                    })
                    .collect(),
            ),
            KeywordOutput::Soap(SoapResponse::Text(text)) => Value::String(text.clone()),
            KeywordOutput::Soap(SoapResponse::Xml(root)) => {
                serde_json::to_value(root).unwrap_or(Value::Null)
            }
        }
    }
}

impl HttpLibrary {
    /// Display names of every keyword, in catalogue order.
    pub fn keyword_names(&self) -> Vec<&'static str> {
        KEYWORDS.iter().map(|spec| spec.name).collect()
    }

    pub fn keyword_arguments(&self, name: &str) -> Option<&'static [&'static str]> {
        find_keyword(name).map(|spec| spec.args)
    }

    pub fn keyword_documentation(&self, name: &str) -> Option<&'static str> {
        find_keyword(name).map(|spec| spec.doc)
    }

    /// Runs keyword `name` with loosely-typed arguments.
    ///
    /// # Errors
    ///
    /// `KeywordError::UnknownKeyword` for a name outside the catalogue,
    /// `KeywordError::InvalidArgument` when the arguments do not fit the
    /// keyword's signature, plus anything the keyword itself reports.
    pub fn run_keyword(&mut self, name: &str, args: &KeywordArgs) -> Result<KeywordOutput> {
        let spec = find_keyword(name).ok_or_else(|| KeywordError::UnknownKeyword(name.to_string()))?;
        let bound = args.bind(spec)?;
        tracing::debug!(keyword = spec.name, "running keyword");

        match spec.id {
            KeywordId::CreateRestSession => {
                let alias = bound.string("alias")?;
                let options = SessionOptions {
                    headers: bound.pairs("headers")?,
                    auth: bound.auth("auth")?,
                    verify: Some(bound.flag("verify", self.config().verify_ssl)?),
                    cert: bound.opt_string("cert")?.map(Into::into),
                };
                self.create_rest_session(&alias, options)?;
                Ok(KeywordOutput::None)
            }
            KeywordId::Verb(method) => {
                let alias = bound.string("alias")?;
                let url = bound.string("url")?;
                let options = request_options(method, &bound)?;
                self.request(method, &alias, &url, options)
                    .map(KeywordOutput::Response)
            }
            KeywordId::CloseAllSessions => {
                self.close_all_sessions();
                Ok(KeywordOutput::None)
            }
            KeywordId::ConvertToMultipartEncodedFiles => {
                let triples = bound.file_triples("files")?;
                convert_to_multipart_encoded_files(&triples).map(KeywordOutput::Files)
            }
            KeywordId::CreateSoapClient => {
                let alias = bound.string("alias")?;
                let wsdl = bound.opt_string("wsdl")?;
                let endpoint = bound.opt_string("endpoint")?;
                self.create_soap_client(&alias, wsdl.as_deref(), endpoint.as_deref())?;
                Ok(KeywordOutput::None)
            }
            KeywordId::CallSoapMethod => {
                let alias = bound.string("alias")?;
                let method = bound.string("name")?;
                let message = bound
                    .text("message")?
                    .ok_or_else(|| KeywordError::invalid_argument("message", "missing value"))?;
                let options = SoapCallOptions {
                    replace: bound.pairs("replace")?,
                    endpoint: bound.opt_string("endpoint")?,
                    expect_fault: bound.flag("expect_fault", false)?,
                    as_xml: bound.flag("xml", true)?,
                    timeout: bound.timeout("timeout")?,
                };
                self.call_soap_method(&alias, &method, &message, &options)
                    .map(KeywordOutput::Soap)
            }
        }
    }
}

/// Collects the request options a verb's signature exposes.
fn request_options(method: HttpMethod, bound: &BoundArgs) -> Result<RequestOptions> {
    let mut options = RequestOptions {
        headers: bound.pairs("headers")?,
        cookies: bound.pairs("cookies")?,
        timeout: bound.timeout("timeout")?,
        ..RequestOptions::default()
    };
    if method.accepts_params() {
        options.params = bound.pairs("params")?;
    }
    if method.requires_data() {
        options.data = bound.text("data")?;
    }
    if method.accepts_files() {
        let triples = bound.file_triples("files")?;
        options.files = convert_to_multipart_encoded_files(&triples)?;
    }
    Ok(options)
}
