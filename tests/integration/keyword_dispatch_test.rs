//! Keyword dispatch integration tests
//!
//! These tests invoke keywords by name with loosely-typed arguments, the way a
//! host test engine does, and check the JSON rendering of their results.

use super::{init_test_env, temp_file, RESPONSE_ENVELOPE, WSDL};
use http_keywords::{HttpLibrary, KeywordArgs, KeywordError, KeywordOutput, SoapResponse};
use mockito::Matcher;
use serde_json::json;

fn library() -> HttpLibrary {
    init_test_env();
    HttpLibrary::new()
}

#[test]
fn test_rest_workflow_by_name() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/users")
        .match_query(Matcher::UrlEncoded("q".into(), "alice".into()))
        .match_header("authorization", "Basic dXNlcjpwYXNz")
        .match_header("x-client", "robot")
        .with_status(200)
        .with_body(r#"{"users":[{"name":"alice"}]}"#)
        .create();

    let mut library = library();
    library
        .run_keyword(
            "Create Rest Session",
            &KeywordArgs::new()
                .arg("api")
                .named("headers", json!({"X-Client": "robot"}))
                .named("auth", json!(["user", "pass"]))
                .named("verify", "False"),
        )
        .unwrap();

    let output = library
        .run_keyword(
            "get",
            &KeywordArgs::new()
                .arg("api")
                .arg(format!("{}/users", server.url()))
                .named("params", json!({"q": "alice"}))
                .named("timeout", "5"),
        )
        .unwrap();

    mock.assert();
    let value = output.to_value();
    assert_eq!(value["status"], 200);
    assert_eq!(value["body"]["users"][0]["name"], "alice");
}

#[test]
fn test_post_files_by_name() {
    let (_dir, path) = temp_file("a.txt", b"file body");
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/upload")
        .match_body(Matcher::Regex(r#"filename="a.txt""#.into()))
        .with_status(200)
        .with_body("stored")
        .create();

    let mut library = library();
    library
        .run_keyword("Create Rest Session", &KeywordArgs::new().arg("api"))
        .unwrap();

    let files = library
        .run_keyword(
            "Convert To Multipart Encoded Files",
            &KeywordArgs::new().arg(json!([["file", path.to_str().unwrap(), "text/plain"]])),
        )
        .unwrap();
    assert!(matches!(files, KeywordOutput::Files(ref f) if f.len() == 1));

    let output = library
        .run_keyword(
            "Post",
            &KeywordArgs::new()
                .arg("api")
                .arg(format!("{}/upload", server.url()))
                .named("files", files.to_value()),
        )
        .unwrap();

    mock.assert();
    assert_eq!(output.to_value()["body"], "stored");
}

#[test]
fn test_post_with_data_and_files_is_rejected() {
    let (_dir, path) = temp_file("a.txt", b"x");
    let mut library = library();
    library
        .run_keyword("Create Rest Session", &KeywordArgs::new().arg("api"))
        .unwrap();

    let err = library
        .run_keyword(
            "Post",
            &KeywordArgs::new()
                .arg("api")
                .arg("http://127.0.0.1:1/")
                .named("data", "body")
                .named("files", json!([["file", path.to_str().unwrap(), "text/plain"]])),
        )
        .unwrap_err();
    assert!(matches!(err, KeywordError::InvalidArgument { .. }));
}

#[test]
fn test_soap_workflow_by_name() {
    let (_dir, wsdl_path) = temp_file("ws_example.wsdl", WSDL.as_bytes());
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/soap")
        .match_header("soapaction", "urn:getUserName")
        .match_body("<id>64</id>")
        .with_status(200)
        .with_body(RESPONSE_ENVELOPE)
        .create();

    let mut library = library();
    library
        .run_keyword(
            "Create Soap Client",
            &KeywordArgs::new()
                .arg("users")
                .arg(wsdl_path.to_str().unwrap())
                .arg(format!("{}/soap", server.url())),
        )
        .unwrap();

    let output = library
        .run_keyword(
            "Call Soap Method",
            &KeywordArgs::new()
                .arg("users")
                .arg("getUserName")
                .arg("<id>_id_</id>")
                .named("replace", json!({"_id_": "64"}))
                .named("xml", "false"),
        )
        .unwrap();

    mock.assert();
    assert_eq!(
        output,
        KeywordOutput::Soap(SoapResponse::Text(RESPONSE_ENVELOPE.to_string()))
    );
}

#[test]
fn test_expect_fault_coercion_errors() {
    let mut library = library();
    library
        .run_keyword(
            "Create Soap Client",
            &KeywordArgs::new().arg("users").named("endpoint", "http://127.0.0.1:1/"),
        )
        .unwrap();

    let err = library
        .run_keyword(
            "Call Soap Method",
            &KeywordArgs::new()
                .arg("users")
                .arg("m")
                .arg("<a/>")
                .named("expect_fault", "perhaps"),
        )
        .unwrap_err();
    assert!(matches!(err, KeywordError::InvalidArgument { ref name, .. } if name == "expect_fault"));
}

#[test]
fn test_rest_and_soap_share_an_alias() {
    let mut server = mockito::Server::new();
    let get = server.mock("GET", "/users").with_status(200).with_body("[]").create();
    let call = server
        .mock("POST", "/soap")
        .with_status(200)
        .with_body(RESPONSE_ENVELOPE)
        .expect(2)
        .create();

    let mut library = library();
    library
        .run_keyword("Create Rest Session", &KeywordArgs::new().arg("svc"))
        .unwrap();
    library
        .run_keyword(
            "Create Soap Client",
            &KeywordArgs::new().arg("svc").named("endpoint", format!("{}/soap", server.url())),
        )
        .unwrap();

    let soap_call = KeywordArgs::new().arg("svc").arg("m").arg("<a/>");
    library
        .run_keyword("Get", &KeywordArgs::new().arg("svc").arg(format!("{}/users", server.url())))
        .unwrap();
    library.run_keyword("Call Soap Method", &soap_call).unwrap();

    library.run_keyword("Close All Sessions", &KeywordArgs::new()).unwrap();

    let err = library
        .run_keyword("Get", &KeywordArgs::new().arg("svc").arg(format!("{}/users", server.url())))
        .unwrap_err();
    assert!(matches!(err, KeywordError::AliasNotFound(_)));
    library.run_keyword("Call Soap Method", &soap_call).unwrap();

    get.assert();
    call.assert();
}
