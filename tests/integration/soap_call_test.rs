//! SOAP call integration tests
//!
//! These tests create SOAP clients from WSDL files and URLs, post envelopes to
//! a mockito server and check header shaping, placeholder substitution and
//! fault expectation handling.

use super::{
    init_test_env, silent_server, temp_file, FAULT_ENVELOPE, REQUEST_ENVELOPE, RESPONSE_ENVELOPE,
    WSDL,
};
use http_keywords::{
    EnvelopePolicy, HttpLibrary, KeywordError, SoapCallOptions, SoapResponse,
};
use mockito::Matcher;
use std::time::Duration;

fn soap_library() -> HttpLibrary {
    init_test_env();
    HttpLibrary::new()
}

#[test]
fn test_call_sends_action_headers_and_replaced_body() {
    let (_dir, wsdl_path) = temp_file("ws_example.wsdl", WSDL.as_bytes());
    let mut server = mockito::Server::new();
    let expected_body = REQUEST_ENVELOPE.replace("_id_", "64");
    let mock = server
        .mock("POST", "/soap")
        .match_header("soapaction", "urn:getUserName")
        .match_header("content-type", "text/xml;charset=UTF-8")
        .match_header("accept-encoding", "gzip,deflate")
        .match_body(expected_body.as_str())
        .with_status(200)
        .with_body(RESPONSE_ENVELOPE)
        .create();

    let mut library = soap_library();
    let endpoint = format!("{}/soap", server.url());
    library
        .create_soap_client("users", wsdl_path.to_str(), Some(&endpoint))
        .unwrap();

    let response = library
        .call_soap_method(
            "users",
            "getUserName",
            REQUEST_ENVELOPE,
            &SoapCallOptions::new().replace("_id_", "64"),
        )
        .unwrap();

    mock.assert();
    let root = response.as_xml().expect("expected a parsed response");
    assert_eq!(root.tag, "{http://schemas.xmlsoap.org/soap/envelope/}Envelope");
    let name = root
        .find("{*}Body/{http://www.example.ru/example}getUserNameResponse/{*}name")
        .unwrap()
        .expect("name element");
    assert_eq!(name.text_trimmed(), "Alice");
}

#[test]
fn test_message_can_come_from_a_file() {
    let (_dir, message_path) = temp_file("request.xml", REQUEST_ENVELOPE.as_bytes());
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/soap")
        .match_header("soapaction", "")
        .match_body(Matcher::Regex("<ex:id>42</ex:id>".into()))
        .with_status(200)
        .with_body(RESPONSE_ENVELOPE)
        .create();

    let mut library = soap_library();
    library
        .create_soap_client("users", None, Some(&format!("{}/soap", server.url())))
        .unwrap();

    let response = library
        .call_soap_method(
            "users",
            "getUserName",
            message_path.to_str().unwrap(),
            &SoapCallOptions::new().replace("_id_", "42").as_xml(false),
        )
        .unwrap();

    mock.assert();
    assert_eq!(response, SoapResponse::Text(RESPONSE_ENVELOPE.to_string()));
}

#[test]
fn test_wsdl_fetched_from_url() {
    let mut server = mockito::Server::new();
    let _wsdl = server
        .mock("GET", "/service")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(WSDL)
        .create();
    let call = server
        .mock("POST", "/service")
        .match_header("soapaction", "urn:getUserName")
        .with_status(200)
        .with_body(RESPONSE_ENVELOPE)
        .create();

    let mut library = soap_library();
    let base = server.url();
    library
        .create_soap_client(
            "users",
            Some(&format!("{}/service?wsdl", base)),
            Some(&format!("{}/service", base)),
        )
        .unwrap();

    library
        .call_soap_method("users", "getUserName", "<a/>", &SoapCallOptions::new())
        .unwrap();
    call.assert();
}

#[test]
fn test_unreachable_wsdl_is_connection_failure() {
    let mut server = mockito::Server::new();
    let _gone = server.mock("GET", "/gone").with_status(503).create();

    let mut library = soap_library();
    let err = library
        .create_soap_client("users", Some(&format!("{}/gone", server.url())), None)
        .unwrap_err();
    assert!(matches!(err, KeywordError::ConnectionFailure { .. }));

    let err = library
        .create_soap_client("users", Some("missing/ws_example.wsdl"), None)
        .unwrap_err();
    assert!(matches!(err, KeywordError::NotFound(_)));
    assert!(library.soap_clients().is_empty());
}

#[test]
fn test_server_fault_against_expectation() {
    let mut server = mockito::Server::new();
    let _fault = server
        .mock("POST", "/soap")
        .with_status(500)
        .with_body(FAULT_ENVELOPE)
        .create();

    let mut library = soap_library();
    library
        .create_soap_client("users", None, Some(&format!("{}/soap", server.url())))
        .unwrap();

    let err = library
        .call_soap_method("users", "getUserName", "<a/>", &SoapCallOptions::new())
        .unwrap_err();
    match err {
        KeywordError::FaultExpectationMismatch {
            expected_fault,
            status,
        } => {
            assert!(!expected_fault);
            assert_eq!(status, 500);
        }
        other => panic!("unexpected error: {}", other),
    }

    let fault = library
        .call_soap_method(
            "users",
            "getUserName",
            "<a/>",
            &SoapCallOptions::new().expect_fault(true),
        )
        .unwrap();
    let root = fault.as_xml().unwrap();
    assert!(root.find("{*}Body/{*}Fault").unwrap().is_some());

    let raw = library
        .call_soap_method(
            "users",
            "getUserName",
            "<a/>",
            &SoapCallOptions::new().expect_fault(true).as_xml(false),
        )
        .unwrap();
    assert_eq!(raw.as_text(), Some(FAULT_ENVELOPE));
}

#[test]
fn test_expected_fault_but_success() {
    let mut server = mockito::Server::new();
    let _ok = server
        .mock("POST", "/soap")
        .with_status(200)
        .with_body(RESPONSE_ENVELOPE)
        .create();

    let mut library = soap_library();
    library
        .create_soap_client("users", None, Some(&format!("{}/soap", server.url())))
        .unwrap();

    let err = library
        .call_soap_method(
            "users",
            "getUserName",
            "<a/>",
            &SoapCallOptions::new().expect_fault(true),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        KeywordError::FaultExpectationMismatch {
            expected_fault: true,
            status: 200
        }
    ));
}

#[test]
fn test_envelope_policy_detects_fault_in_200() {
    let mut server = mockito::Server::new();
    let _fault = server
        .mock("POST", "/soap")
        .with_status(200)
        .with_body(FAULT_ENVELOPE)
        .create();

    init_test_env();
    let mut library = HttpLibrary::new().with_fault_policy(EnvelopePolicy);
    library
        .create_soap_client("users", None, Some(&format!("{}/soap", server.url())))
        .unwrap();

    assert!(library
        .call_soap_method("users", "m", "<a/>", &SoapCallOptions::new())
        .is_err());
    assert!(library
        .call_soap_method("users", "m", "<a/>", &SoapCallOptions::new().expect_fault(true))
        .is_ok());
}

#[test]
fn test_endpoint_override_does_not_persist() {
    let mut stored = mockito::Server::new();
    let mut other = mockito::Server::new();
    let stored_mock = stored
        .mock("POST", "/soap")
        .with_status(200)
        .with_body(RESPONSE_ENVELOPE)
        .expect(1)
        .create();
    let other_mock = other
        .mock("POST", "/soap")
        .with_status(200)
        .with_body(RESPONSE_ENVELOPE)
        .expect(1)
        .create();

    let mut library = soap_library();
    let stored_url = format!("{}/soap", stored.url());
    library
        .create_soap_client("users", None, Some(&stored_url))
        .unwrap();

    library
        .call_soap_method(
            "users",
            "m",
            "<a/>",
            &SoapCallOptions::new().endpoint(format!("{}/soap", other.url())),
        )
        .unwrap();
    library
        .call_soap_method("users", "m", "<a/>", &SoapCallOptions::new())
        .unwrap();

    other_mock.assert();
    stored_mock.assert();
    let client = library.soap_clients().get("users").expect("client registered");
    assert_eq!(client.endpoint(), Some(stored_url.as_str()));
}

#[test]
fn test_malformed_message_and_response() {
    let mut server = mockito::Server::new();
    let _text = server
        .mock("POST", "/soap")
        .with_status(200)
        .with_body("plain text")
        .create();

    let mut library = soap_library();
    library
        .create_soap_client("users", None, Some(&format!("{}/soap", server.url())))
        .unwrap();

    let err = library
        .call_soap_method("users", "m", "<unclosed>", &SoapCallOptions::new())
        .unwrap_err();
    assert!(matches!(err, KeywordError::MalformedInput(_)));

    let err = library
        .call_soap_method("users", "m", "<a/>", &SoapCallOptions::new())
        .unwrap_err();
    assert!(matches!(err, KeywordError::MalformedInput(_)));
}

#[test]
fn test_missing_operation_in_wsdl() {
    let (_dir, wsdl_path) = temp_file("ws_example.wsdl", WSDL.as_bytes());
    let mut library = soap_library();
    library
        .create_soap_client("users", wsdl_path.to_str(), Some("http://127.0.0.1:1/soap"))
        .unwrap();

    let err = library
        .call_soap_method("users", "deleteUser", "<a/>", &SoapCallOptions::new())
        .unwrap_err();
    assert!(matches!(err, KeywordError::NotFound(_)));
}

#[test]
fn test_soap_timeout() {
    let (_listener, addr) = silent_server();
    let mut library = soap_library();
    library
        .create_soap_client("users", None, Some(&format!("http://{}/soap", addr)))
        .unwrap();

    let err = library
        .call_soap_method(
            "users",
            "m",
            "<a/>",
            &SoapCallOptions::new().timeout(Duration::from_secs(1)),
        )
        .unwrap_err();
    assert!(err.is_timeout(), "unexpected error: {}", err);
}
