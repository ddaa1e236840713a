// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Services for communicating with APIs using HTTP.

use log::debug;
use reqwest::{Client, ClientBuilder, RequestBuilder, StatusCode};
use thiserror::Error;

/// A general service for making HTTP calls.
///
/// It might be a bit odd to refer to this trait as a "service", since
/// it appears to be more of a _client_ implementation, but think of
/// this as a proxy for a remote _service_ (even though a _client_ is used
/// to communicate with that remote service). A service might not always
/// be remote, such as when the implementation is a deterministic service
/// used for testing.
pub trait HTTPService {
    /// Default HTTP client that can be used to make HTTP requests.
    ///
    /// Building a client only fails if a TLS backend or the DNS resolver
    /// cannot be initialized.
    fn client() -> HTTPResult<Client> {
        ClientBuilder::new()
            .user_agent(Self::user_agent())
            .build()
            .map_err(HTTPError::Client)
    }

    /// An appropriate user agent to use when making HTTP requests.
    fn user_agent() -> String {
        format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

/// Sends a prepared GET request and returns the raw body of a successful
/// response.
///
/// Anything other than a 2xx status is reported as an error. The body is
/// returned whatever its declared content type; decoding it is up to the
/// caller. The request is sent exactly once.
pub async fn fetch(request: RequestBuilder) -> HTTPResult<String> {
    let resp = request.send().await.map_err(HTTPError::Request)?;
    debug!("GET {} -> {}", resp.url(), resp.status());

    if !resp.status().is_success() {
        return Err(HTTPError::Http(resp.status()));
    }

    resp.text().await.map_err(HTTPError::Body)
}

/// The result of an HTTP request.
pub type HTTPResult<T> = Result<T, HTTPError>;

/// Indicates an error has occurred when making an HTTP call.
#[derive(Debug, Error)]
pub enum HTTPError {
    /// The HTTP client itself could not be created.
    #[error("Could not create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// An error retrieving the body of a response.
    #[error("Error retrieving body of HTTP response: {0}")]
    Body(#[source] reqwest::Error),

    /// An error that occurred while making an HTTP request.
    #[error("Error while making HTTP request: {0}")]
    Request(#[source] reqwest::Error),

    /// An error that occurred while serializing request parameters.
    #[error("Error serializing request parameters: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An unsuccessful HTTP status code in an HTTP response.
    #[error("Request returned HTTP {0}")]
    Http(StatusCode),
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    struct UserAgentTestService;
    impl HTTPService for UserAgentTestService {}

    #[test]
    fn it_returns_user_agent_with_version_number() {
        let user_agent = UserAgentTestService::user_agent();
        let version_re = Regex::new(r"^[a-z]+ v\d+\.\d+\.\d+(-(alpha|beta)\.\d+)?$").unwrap();
        assert!(
            version_re.is_match(&user_agent),
            "{} does not match {}",
            user_agent,
            version_re,
        );
    }

    #[test]
    fn it_builds_a_default_client() {
        assert!(UserAgentTestService::client().is_ok());
    }

    #[test]
    fn it_describes_unsuccessful_statuses() {
        let err = HTTPError::Http(StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.to_string(), "Request returned HTTP 429 Too Many Requests");
    }

    /// Answers a single request with `status`, an optional Content-Type,
    /// and `body`, and returns the URL to send it to.
    async fn serve_once(status: &str, content_type: Option<&str>, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut response = format!("HTTP/1.1 {status}\r\n");
        if let Some(content_type) = content_type {
            response.push_str(&format!("Content-Type: {content_type}\r\n"));
        }
        response.push_str(&format!(
            "Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ));

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}/")
    }

    fn local_client() -> Client {
        ClientBuilder::new().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn it_returns_json_served_with_another_content_type() {
        let body = r#"{"comments":[{"cid":"1"}],"has_more":0}"#;
        let url = serve_once("200 OK", Some("text/javascript; charset=utf-8"), body).await;
        let client = local_client();
        assert_eq!(fetch(client.get(url)).await.unwrap(), body);
    }

    #[tokio::test]
    async fn it_returns_bodies_without_a_content_type() {
        let body = r#"{"data":{"comment":null},"status":"ok"}"#;
        let url = serve_once("200 OK", None, body).await;
        let client = local_client();
        assert_eq!(fetch(client.get(url)).await.unwrap(), body);
    }

    #[tokio::test]
    async fn it_fails_on_unsuccessful_statuses() {
        let url = serve_once("503 Service Unavailable", Some("application/json"), "{}").await;
        let client = local_client();
        let err = fetch(client.get(url)).await.unwrap_err();
        assert!(matches!(err, HTTPError::Http(StatusCode::SERVICE_UNAVAILABLE)));
    }
}
