//! HTTP transport seam.
//!
//! [`Transport`] is the interface the session client drives: JSON GET,
//! JSON POST, and chunked file POST with a progress callback. The
//! production implementation is [`HttpTransport`] over a shared
//! [`reqwest::Client`]; tests substitute a mock.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncReadExt;

use crate::error::TransportError;
use crate::upload::{chunk_spans, content_range_header};

/// Progress callback for chunked uploads: `(bytes_sent, total_bytes)`.
/// Returning `false` cancels the upload.
pub type ProgressFn<'a> = &'a mut (dyn FnMut(u64, u64) -> bool + Send);

/// Delay between retry attempts.
const RETRY_DELAY: Duration = Duration::from_secs(15);

/// Per-request settings forwarded by the session client.
#[derive(Debug, Clone)]
pub struct RequestOpts {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Basic-auth `(user, password)` pair, if any.
    pub basic_auth: Option<(String, String)>,
    /// Extra request headers.
    pub headers: Vec<(String, String)>,
    /// Additional attempts after a retryable failure.
    pub max_retries: u32,
    /// Delay between attempts.
    pub retry_delay: Duration,
}

impl RequestOpts {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
            basic_auth: None,
            headers: Vec::new(),
            max_retries: 0,
            retry_delay: RETRY_DELAY,
        }
    }

    pub fn with_basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some((user.into(), password.into()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Interface between the session client and the HTTP layer.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET and parse the response body as JSON.
    async fn get_json(&self, url: &str, opts: &RequestOpts) -> Result<Value, TransportError>;

    /// Issue a POST with a pre-serialized JSON body and parse the
    /// response body as JSON.
    async fn post_json(
        &self,
        url: &str,
        opts: &RequestOpts,
        body: String,
    ) -> Result<Value, TransportError>;

    /// Upload a file in fixed-size chunks, one POST per chunk with a
    /// `Content-Range` header, invoking `on_chunk` after each chunk.
    /// Returns the final response body.
    async fn post_file_chunked(
        &self,
        url: &str,
        opts: &RequestOpts,
        path: &Path,
        chunk_size: u64,
        on_chunk: ProgressFn<'_>,
    ) -> Result<String, TransportError>;
}

/// `reqwest`-backed [`Transport`] implementation.
///
/// Response-body decompression is transparent: the underlying client is
/// built with gzip support, so a compressed body negotiated via the
/// request headers arrives here already inflated.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .gzip(true)
                .build()
                .expect("default reqwest client is always buildable"),
        }
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling across
    /// several transports).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn apply_opts(&self, builder: reqwest::RequestBuilder, opts: &RequestOpts) -> reqwest::RequestBuilder {
        let mut builder = builder.timeout(opts.timeout);
        if let Some((user, password)) = &opts.basic_auth {
            builder = builder.basic_auth(user, Some(password));
        }
        for (name, value) in &opts.headers {
            builder = builder.header(name, value);
        }
        builder
    }

    /// Send the request built by `build`, retrying on connectivity
    /// failures and 5xx responses up to `opts.max_retries` extra
    /// attempts. 4xx responses are surfaced immediately.
    async fn execute<F>(
        &self,
        opts: &RequestOpts,
        build: F,
    ) -> Result<reqwest::Response, TransportError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let retryable = attempt <= opts.max_retries;

            match self.apply_opts(build(), opts).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    if !(status.is_server_error() && retryable) {
                        let body = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "<unreadable body>".to_string());
                        return Err(TransportError::Status {
                            status: status.as_u16(),
                            body,
                        });
                    }
                    tracing::warn!(
                        attempt,
                        status = status.as_u16(),
                        "Server error, retrying",
                    );
                }
                Err(e) => {
                    if !retryable {
                        return Err(TransportError::Request(e));
                    }
                    tracing::warn!(attempt, error = %e, "Request failed, retrying");
                }
            }

            tokio::time::sleep(opts.retry_delay).await;
        }
    }

    async fn json_body(response: reqwest::Response) -> Result<Value, TransportError> {
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str, opts: &RequestOpts) -> Result<Value, TransportError> {
        let response = self.execute(opts, || self.client.get(url)).await?;
        Self::json_body(response).await
    }

    async fn post_json(
        &self,
        url: &str,
        opts: &RequestOpts,
        body: String,
    ) -> Result<Value, TransportError> {
        let response = self
            .execute(opts, || {
                self.client
                    .post(url)
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(body.clone())
            })
            .await?;
        Self::json_body(response).await
    }

    async fn post_file_chunked(
        &self,
        url: &str,
        opts: &RequestOpts,
        path: &Path,
        chunk_size: u64,
        on_chunk: ProgressFn<'_>,
    ) -> Result<String, TransportError> {
        let total = tokio::fs::metadata(path).await?.len();
        let mut file = tokio::fs::File::open(path).await?;
        let mut last_body = String::new();

        let spans = chunk_spans(total, chunk_size);
        if spans.is_empty() {
            // Zero-byte file: one empty POST so the job still receives
            // its upload-complete signal.
            let response = self
                .execute(opts, || self.client.post(url).body(Vec::<u8>::new()))
                .await?;
            last_body = response.text().await?;
            on_chunk(0, 0);
            return Ok(last_body);
        }

        for span in spans {
            let mut buffer = vec![0u8; (span.end - span.start) as usize];
            file.read_exact(&mut buffer).await?;

            let range_header = content_range_header(&span, total);
            let response = self
                .execute(opts, || {
                    self.client
                        .post(url)
                        .header(reqwest::header::CONTENT_RANGE, range_header.clone())
                        .body(buffer.clone())
                })
                .await?;
            last_body = response.text().await?;

            tracing::debug!(url, bytes_sent = span.end, total, "Uploaded chunk");
            if !on_chunk(span.end, total) {
                return Err(TransportError::Cancelled {
                    bytes_sent: span.end,
                });
            }
        }

        Ok(last_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn opts_builders_accumulate() {
        let opts = RequestOpts::new(15)
            .with_basic_auth("42", "wk-secret")
            .with_header("X-ResponseBodyCompressed", "true")
            .with_max_retries(2);
        assert_eq!(opts.timeout, Duration::from_secs(15));
        assert_eq!(
            opts.basic_auth,
            Some(("42".to_string(), "wk-secret".to_string()))
        );
        assert_eq!(opts.headers.len(), 1);
        assert_eq!(opts.max_retries, 2);
    }

    #[tokio::test]
    async fn upload_of_missing_file_fails_before_any_request() {
        let transport = HttpTransport::new();
        let opts = RequestOpts::new(1);
        let mut on_chunk = |_: u64, _: u64| true;

        let err = transport
            .post_file_chunked(
                "http://localhost:9/binary/1",
                &opts,
                Path::new("/nonexistent/content.bin"),
                8,
                &mut on_chunk,
            )
            .await
            .unwrap_err();

        assert_matches!(err, TransportError::Io(_));
    }
}
