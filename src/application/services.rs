use crate::domain::entities::{RequestSpec, Response};
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

/// Trait for HTTP clients to enable mocking and dependency inversion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: &RequestSpec) -> Result<Response>;
}

/// Application service for the single request this tool makes
pub struct HttpRequestService {
    http_client: Box<dyn HttpClient>,
}

impl HttpRequestService {
    pub fn new(http_client: Box<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// Sends the request described by `request`. Any HTTP status counts as
    /// success; only construction and transport failures are errors.
    pub async fn send_request(&self, request: &RequestSpec) -> Result<Response> {
        debug!(method = %request.method, url = request.url.as_str(), "sending request");
        let response = self.http_client.send(request).await?;
        debug!(status = %response.status, "received response");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::builders::request_builder::RequestBuilder;
    use anyhow::anyhow;
    use futures::StreamExt;
    use hyper::{HeaderMap, StatusCode};

    fn request() -> RequestSpec {
        RequestBuilder::positionals(&["get", "example.com"])
            .unwrap()
            .build()
    }

    #[tokio::test]
    async fn error_statuses_are_returned_as_responses() {
        let mut client = MockHttpClient::new();
        client
            .expect_send()
            .withf(|request| request.url.as_str() == "http://example.com")
            .times(1)
            .returning(|_| {
                Ok(Response {
                    status: StatusCode::NOT_FOUND,
                    reason: None,
                    headers: HeaderMap::new(),
                    body: futures::stream::empty().boxed(),
                })
            });

        let service = HttpRequestService::new(Box::new(client));
        let response = service.send_request(&request()).await.unwrap();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let mut client = MockHttpClient::new();
        client
            .expect_send()
            .returning(|_| Err(anyhow!("connection refused")));

        let service = HttpRequestService::new(Box::new(client));
        let err = service.send_request(&request()).await.unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
    }
}
