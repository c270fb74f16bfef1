//! Data models for HTTP requests and responses.

pub mod request;
pub mod response;

pub use request::{HttpMethod, HttpRequest, RequestOptions};
pub use response::{HttpResponse, KeywordResponse, ResponseBody};
