//! REST session integration tests
//!
//! These tests drive the REST keywords against a local mockito server and
//! check request shaping (query, headers, auth, cookies, bodies, multipart)
//! and response normalization.

use super::{init_test_env, silent_server, temp_file};
use http_keywords::{
    convert_to_multipart_encoded_files, HttpLibrary, KeywordError, RequestOptions, ResponseBody,
    SessionOptions,
};
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

fn library_with_session(alias: &str, options: SessionOptions) -> HttpLibrary {
    init_test_env();
    let mut library = HttpLibrary::new();
    library
        .create_rest_session(alias, options)
        .expect("Failed to create session");
    library
}

#[test]
fn test_get_decodes_json_body() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/users")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"a":1}"#)
        .create();

    let mut library = library_with_session("api", SessionOptions::new());
    let response = library
        .get(
            "api",
            &format!("{}/users", server.url()),
            RequestOptions::new().param("page", "2"),
        )
        .unwrap();

    mock.assert();
    assert_eq!(response.status, 200);
    assert_eq!(response.header("Content-Type"), Some("application/json"));
    assert_eq!(response.body, Some(ResponseBody::Json(json!({"a": 1}))));
}

#[test]
fn test_non_json_body_is_raw_bytes() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/page")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("<html>hi</html>")
        .create();

    let mut library = library_with_session("api", SessionOptions::new());
    let response = library
        .get("api", &format!("{}/page", server.url()), RequestOptions::new())
        .unwrap();

    assert_eq!(
        response.body,
        Some(ResponseBody::Raw(b"<html>hi</html>".to_vec()))
    );
}

#[test]
fn test_error_status_is_returned_not_raised() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("GET", "/missing").with_status(404).create();

    let mut library = library_with_session("api", SessionOptions::new());
    let response = library
        .get("api", &format!("{}/missing", server.url()), RequestOptions::new())
        .unwrap();

    assert_eq!(response.status, 404);
}

#[test]
fn test_head_has_no_body() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("HEAD", "/status")
        .with_status(200)
        .with_header("x-trace", "abc")
        .create();

    let mut library = library_with_session("api", SessionOptions::new());
    let response = library
        .head("api", &format!("{}/status", server.url()), RequestOptions::new())
        .unwrap();

    mock.assert();
    assert_eq!(response.status, 200);
    assert_eq!(response.header("X-Trace"), Some("abc"));
    assert!(response.body.is_none());
}

#[test]
fn test_session_headers_and_basic_auth_are_sent() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/secure")
        .match_header("authorization", "Basic dXNlcjpwYXNz")
        .match_header("x-api-version", "3")
        .match_header("cookie", "sessionid=s1; lang=en")
        .with_status(200)
        .create();

    let options = SessionOptions::new()
        .header("X-Api-Version", "3")
        .auth("user", "pass");
    let mut library = library_with_session("api", options);
    library
        .get(
            "api",
            &format!("{}/secure", server.url()),
            RequestOptions::new().cookie("sessionid", "s1").cookie("lang", "en"),
        )
        .unwrap();

    mock.assert();
}

#[test]
fn test_request_header_overrides_session_header() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/")
        .match_header("accept", "text/plain")
        .with_status(200)
        .create();

    let mut library = library_with_session("api", SessionOptions::new().header("Accept", "application/json"));
    library
        .get(
            "api",
            &format!("{}/", server.url()),
            RequestOptions::new().header("Accept", "text/plain"),
        )
        .unwrap();

    mock.assert();
}

#[test]
fn test_post_put_delete_send_utf8_bodies() {
    let mut server = mockito::Server::new();
    let post = server
        .mock("POST", "/items")
        .match_body(r#"{"name":"café"}"#)
        .with_status(201)
        .with_body(r#"{"id":7}"#)
        .create();
    let put = server
        .mock("PUT", "/items/7")
        .match_body("updated")
        .with_status(200)
        .create();
    let delete = server
        .mock("DELETE", "/items/7")
        .match_body("{}")
        .with_status(204)
        .create();

    let mut library = library_with_session("api", SessionOptions::new());
    let base = server.url();

    let created = library
        .post("api", &format!("{}/items", base), RequestOptions::new().data(r#"{"name":"café"}"#))
        .unwrap();
    assert_eq!(created.status, 201);
    assert_eq!(created.body, Some(ResponseBody::Json(json!({"id": 7}))));

    let updated = library
        .put("api", &format!("{}/items/7", base), RequestOptions::new().data("updated"))
        .unwrap();
    assert_eq!(updated.status, 200);

    let deleted = library
        .delete("api", &format!("{}/items/7", base), RequestOptions::new().data("{}"))
        .unwrap();
    assert_eq!(deleted.status, 204);

    post.assert();
    put.assert();
    delete.assert();
}

#[test]
fn test_multipart_upload() {
    let (_dir, path) = temp_file("a.txt", b"hello upload");
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/upload")
        .match_header("content-type", Matcher::Regex("^multipart/form-data; boundary=".into()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="a.txt""#.into()),
            Matcher::Regex("hello upload".into()),
        ]))
        .with_status(200)
        .create();

    let files = convert_to_multipart_encoded_files(&[("file", path.as_path(), "text/plain")]).unwrap();
    assert_eq!(files[0].file_name, "a.txt");

    let mut library = library_with_session("api", SessionOptions::new());
    let response = library
        .post("api", &format!("{}/upload", server.url()), RequestOptions::new().files(files))
        .unwrap();

    mock.assert();
    assert_eq!(response.status, 200);
}

#[test]
fn test_timeout_is_reported() {
    let (_listener, addr) = silent_server();
    let mut library = library_with_session("api", SessionOptions::new());

    let err = library
        .get(
            "api",
            &format!("http://{}/slow", addr),
            RequestOptions::new().timeout(Duration::from_secs(1)),
        )
        .unwrap_err();

    assert!(err.is_timeout(), "unexpected error: {}", err);
}

#[test]
fn test_last_registration_wins() {
    let mut first = mockito::Server::new();
    let mut second = mockito::Server::new();
    let _a = first.mock("GET", "/").match_header("x-session", "one").with_status(200).create();
    let b = second.mock("GET", "/").match_header("x-session", "two").with_status(200).create();

    let mut library = library_with_session("api", SessionOptions::new().header("X-Session", "one"));
    library
        .create_rest_session("api", SessionOptions::new().header("X-Session", "two"))
        .unwrap();

    let response = library
        .get("api", &format!("{}/", second.url()), RequestOptions::new())
        .unwrap();

    b.assert();
    assert_eq!(response.status, 200);
    assert_eq!(library.rest_sessions().len(), 1);
    assert_eq!(library.rest_sessions().current_alias(), Some("api"));
}

#[test]
fn test_unknown_alias_and_close_all() {
    let mut library = library_with_session("api", SessionOptions::new());
    library.create_rest_session("admin", SessionOptions::new()).unwrap();

    let err = library
        .get("nobody", "http://127.0.0.1:1/", RequestOptions::new())
        .unwrap_err();
    assert!(err.is_not_found());

    library.close_all_sessions();
    for alias in ["api", "admin"] {
        let err = library
            .get(alias, "http://127.0.0.1:1/", RequestOptions::new())
            .unwrap_err();
        assert!(matches!(err, KeywordError::AliasNotFound(ref a) if a == alias));
    }
    assert_eq!(library.rest_sessions().current_alias(), None);
}
