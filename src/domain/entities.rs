use crate::domain::value_objects::{BasicAuth, ExtraHeaders, FormParams, Url};
use anyhow::Result;
use futures::stream::BoxStream;
use hyper::body::Bytes;
use hyper::{HeaderMap, StatusCode};
use std::fmt;
use std::str::FromStr;

/// HTTP methods accepted as the first positional argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Head,
    Put,
    Delete,
    Options,
}

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "HEAD" => Ok(Method::Head),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(UnknownMethod),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Head => "HEAD",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
        };
        f.write_str(name)
    }
}

/// The token is not one of the recognised methods and should be read as a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMethod;

/// Where the request body comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySource {
    /// URL-encoded form parameters
    Form(String),
    /// Standard input, read while the request is written
    Stdin,
    Empty,
}

/// Which parts of the response get printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Full,
    HeadersOnly,
    BodyOnly,
}

impl OutputMode {
    /// Body-only wins when both flags are given
    pub fn from_flags(headers_only: bool, body_only: bool) -> Self {
        if body_only {
            OutputMode::BodyOnly
        } else if headers_only {
            OutputMode::HeadersOnly
        } else {
            OutputMode::Full
        }
    }

    pub fn shows_headers(self) -> bool {
        self != OutputMode::BodyOnly
    }

    pub fn shows_body(self) -> bool {
        self != OutputMode::HeadersOnly
    }
}

/// Everything needed to issue one request and print its response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: Method,
    pub url: Url,
    pub form_params: FormParams,
    pub headers: ExtraHeaders,
    pub basic_auth: Option<BasicAuth>,
    pub body: BodySource,
    pub output: OutputMode,
}

/// One-shot stream over the response body
pub type BodyStream = BoxStream<'static, Result<Bytes>>;

/// Represents an HTTP response
pub struct Response {
    pub status: StatusCode,
    /// Reason phrase sent by the server, when it differs from the canonical one
    pub reason: Option<String>,
    pub headers: HeaderMap,
    pub body: BodyStream,
}

impl Response {
    /// Status line as printed, e.g. `200 OK`
    pub fn status_line(&self) -> String {
        let reason = self
            .reason
            .as_deref()
            .or_else(|| self.status.canonical_reason())
            .unwrap_or("");
        format!("{} {}", self.status.as_str(), reason)
            .trim_end()
            .to_string()
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("reason", &self.reason)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn response(status: u16, reason: Option<&str>) -> Response {
        Response {
            status: StatusCode::from_u16(status).unwrap(),
            reason: reason.map(str::to_string),
            headers: HeaderMap::new(),
            body: futures::stream::empty().boxed(),
        }
    }

    #[test]
    fn methods_parse_case_insensitively() {
        let cases = [
            ("get", Method::Get),
            ("POST", Method::Post),
            ("Head", Method::Head),
            ("put", Method::Put),
            ("DeLeTe", Method::Delete),
            ("options", Method::Options),
        ];
        for (raw, expected) in cases {
            assert_eq!(raw.parse::<Method>(), Ok(expected));
            assert_eq!(expected.to_string(), raw.to_uppercase());
        }
    }

    #[test]
    fn unknown_tokens_are_not_methods() {
        for raw in ["www.example.com", "PATCH", "OPTION", ""] {
            assert_eq!(raw.parse::<Method>(), Err(UnknownMethod));
        }
    }

    #[test]
    fn output_mode_prefers_body_only() {
        assert_eq!(OutputMode::from_flags(false, false), OutputMode::Full);
        assert_eq!(OutputMode::from_flags(true, false), OutputMode::HeadersOnly);
        assert_eq!(OutputMode::from_flags(false, true), OutputMode::BodyOnly);
        assert_eq!(OutputMode::from_flags(true, true), OutputMode::BodyOnly);
    }

    #[test]
    fn status_line_uses_server_reason_when_present() {
        assert_eq!(response(200, None).status_line(), "200 OK");
        assert_eq!(response(404, None).status_line(), "404 Not Found");
        assert_eq!(response(200, Some("Fine")).status_line(), "200 Fine");
        assert_eq!(response(599, None).status_line(), "599");
    }
}
