use crate::application::services::{HttpClient, HttpRequestService};
use crate::domain::entities::{BodySource, Method as DomainMethod, RequestSpec, Response};
use crate::domain::value_objects::{BasicAuth, ExtraHeaders, Url};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame, Incoming};
use hyper::ext::ReasonPhrase;
use hyper::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use hyper::{Method, Request as HyperRequest, Uri};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_native_tls::{TlsConnector, native_tls};

const DEFAULT_USER_AGENT: &str = concat!("gurl/", env!("CARGO_PKG_VERSION"));
const READ_CHUNK_SIZE: usize = 8 * 1024;

type RequestBody = UnsyncBoxBody<Bytes, io::Error>;

/// Infrastructure implementation of HttpClient using Hyper.
/// Plain HTTP and HTTPS with the platform's default TLS settings.
pub struct HyperHttpClient {
    client: Client<HttpsConnector<HttpConnector>, RequestBody>,
}

impl HyperHttpClient {
    pub fn new() -> Result<Self> {
        let mut http = HttpConnector::new();
        http.enforce_http(false);
        let tls = native_tls::TlsConnector::new().context("Failed to initialise TLS")?;
        let connector = HttpsConnector::from((http, TlsConnector::from(tls)));
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Ok(Self { client })
    }

    /// Creates a configured HTTP request service using this client
    pub fn create_request_service(self) -> HttpRequestService {
        HttpRequestService::new(Box::new(self))
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn send(&self, request: &RequestSpec) -> Result<Response> {
        let hyper_request = RequestAdapter::to_hyper_request(request)?;
        let hyper_response = self
            .client
            .request(hyper_request)
            .await
            .context("HTTP request execution failed")?;
        Ok(ResponseAdapter::to_domain_response(hyper_response))
    }
}

/// Adapter for converting a request spec to a Hyper request
struct RequestAdapter;

impl RequestAdapter {
    fn to_hyper_request(spec: &RequestSpec) -> Result<HyperRequest<RequestBody>> {
        let method = MethodAdapter::to_hyper_method(spec.method);
        let uri = UriAdapter::to_hyper_uri(&spec.url)?;
        let body = BodyAdapter::to_hyper_body(&spec.body);

        let builder = HyperRequest::builder().method(method).uri(uri);

        let mut request = HeaderAdapter::add_default_headers(builder)
            .body(body)
            .map_err(|e| anyhow!("Failed to build HTTP request: {}", e))?;

        HeaderAdapter::set_extra_headers(request.headers_mut(), &spec.headers)?;
        if let Some(credentials) = &spec.basic_auth {
            HeaderAdapter::set_basic_auth(request.headers_mut(), credentials)?;
        }
        Ok(request)
    }
}

/// Adapter for converting Hyper responses to domain responses
struct ResponseAdapter;

impl ResponseAdapter {
    fn to_domain_response(hyper_response: hyper::Response<Incoming>) -> Response {
        let (parts, body) = hyper_response.into_parts();
        let reason = parts
            .extensions
            .get::<ReasonPhrase>()
            .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned());

        Response {
            status: parts.status,
            reason,
            headers: parts.headers,
            body: body.into_data_stream().map_err(anyhow::Error::from).boxed(),
        }
    }
}

/// Adapter for converting domain HTTP methods to Hyper methods
struct MethodAdapter;

impl MethodAdapter {
    fn to_hyper_method(domain_method: DomainMethod) -> Method {
        match domain_method {
            DomainMethod::Get => Method::GET,
            DomainMethod::Post => Method::POST,
            DomainMethod::Head => Method::HEAD,
            DomainMethod::Put => Method::PUT,
            DomainMethod::Delete => Method::DELETE,
            DomainMethod::Options => Method::OPTIONS,
        }
    }
}

/// Adapter for converting domain URLs to Hyper URIs
struct UriAdapter;

impl UriAdapter {
    fn to_hyper_uri(domain_url: &Url) -> Result<Uri> {
        domain_url
            .as_str()
            .parse::<Uri>()
            .map_err(|e| anyhow!("Invalid URL '{}': {}", domain_url.as_str(), e))
    }
}

/// Adapter for converting domain body sources to Hyper bodies
struct BodyAdapter;

impl BodyAdapter {
    fn to_hyper_body(source: &BodySource) -> RequestBody {
        match source {
            BodySource::Form(encoded) => Full::new(Bytes::from(encoded.clone()))
                .map_err(|never| match never {})
                .boxed_unsync(),
            BodySource::Stdin => Self::reader_body(tokio::io::stdin()),
            BodySource::Empty => Empty::<Bytes>::new()
                .map_err(|never| match never {})
                .boxed_unsync(),
        }
    }

    /// Streams `reader` into the request as it is written
    fn reader_body<R>(reader: R) -> RequestBody
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        let chunks = futures::stream::unfold(reader, |mut reader| async move {
            let mut buf = vec![0; READ_CHUNK_SIZE];
            match reader.read(&mut buf).await {
                Ok(0) => None,
                Ok(n) => {
                    buf.truncate(n);
                    Some((Ok(Frame::data(Bytes::from(buf))), reader))
                }
                Err(e) => Some((Err(e), reader)),
            }
        });
        StreamBody::new(chunks).boxed_unsync()
    }
}

/// Adapter for handling HTTP headers
struct HeaderAdapter;

impl HeaderAdapter {
    fn add_default_headers(builder: http::request::Builder) -> http::request::Builder {
        builder.header(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT))
    }

    /// Replaces rather than appends, so later fields win over earlier ones
    /// and over the defaults set at construction.
    fn set_extra_headers(headers: &mut HeaderMap, extra: &ExtraHeaders) -> Result<()> {
        for (name, value) in extra.iter() {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| anyhow!("Invalid header name '{}': {}", name, e))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| anyhow!("Invalid value for header '{}': {}", name, e))?;
            headers.insert(header_name, header_value);
        }
        Ok(())
    }

    fn set_basic_auth(headers: &mut HeaderMap, credentials: &BasicAuth) -> Result<()> {
        let value = HeaderValue::from_str(&credentials.header_value())
            .context("Invalid basic auth credentials")?;
        headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}
