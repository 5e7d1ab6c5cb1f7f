//! `DataSource` over an HTTP list endpoint.
//!
//! The endpoint takes the page request as query parameters
//! (`page`, `pageSize`, `sortField`, `sortOrder`) and answers with a
//! `{"data": [...], "total": n}` envelope.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use datagrid::{DataSource, FetchError, FetchRequest, PageResult};

use crate::config::HttpSourceConfig;
use crate::error::HttpSourceError;

/// Fetches pages of `T` from a list endpoint.
///
/// Cheap to clone; clones share the HTTP client.
///
/// # Example
///
/// ```ignore
/// let source = HttpDataSource::<User>::builder()
///     .url("http://localhost:8080/api/users")
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let grid = GridController::builder(source, columns).build()?;
/// ```
pub struct HttpDataSource<T> {
    inner: Arc<HttpDataSourceInner>,
    _record: PhantomData<fn() -> T>,
}

struct HttpDataSourceInner {
    base_url: Url,
    http_client: Client,
    timeout: Option<Duration>,
    headers: Vec<(String, String)>,
}

impl<T> HttpDataSource<T> {
    /// Creates a new builder for constructing a source.
    pub fn builder() -> HttpDataSourceBuilder<T, Missing> {
        HttpDataSourceBuilder::new()
    }

    /// Builds a source from a loaded config.
    pub fn from_config(config: &HttpSourceConfig) -> Result<Self, HttpSourceError> {
        let mut builder = Self::builder().url(config.base_url.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        for (name, value) in &config.headers {
            builder = builder.header(name.clone(), value.clone());
        }
        builder.build()
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The URL requested for `request`.
    pub fn request_url(&self, request: &FetchRequest) -> Url {
        request_url(&self.inner.base_url, request)
    }

    fn classify(&self, err: reqwest::Error) -> HttpSourceError {
        match self.inner.timeout {
            Some(timeout) if err.is_timeout() => HttpSourceError::Timeout(timeout),
            _ => HttpSourceError::Network(err),
        }
    }
}

impl<T: DeserializeOwned> HttpDataSource<T> {
    /// Fetches one page, keeping the HTTP-level error.
    pub async fn fetch_page(&self, request: &FetchRequest) -> Result<PageResult<T>, HttpSourceError> {
        let url = self.request_url(request);
        log::debug!("GET {}", url);

        let mut builder = self.inner.http_client.get(url);
        for (name, value) in &self.inner.headers {
            builder = builder.header(name, value);
        }
        if let Some(timeout) = self.inner.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            log::warn!("List request failed with HTTP {}", status.as_u16());
            return Err(HttpSourceError::http(status.as_u16(), body));
        }
        parse_page(&body)
    }
}

#[async_trait]
impl<T> DataSource<T> for HttpDataSource<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self, request: FetchRequest) -> Result<PageResult<T>, FetchError> {
        Ok(self.fetch_page(&request).await?)
    }
}

impl<T> Clone for HttpDataSource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for HttpDataSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpDataSource")
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

/// Appends the page request to `base` as query parameters.
///
/// Sort parameters are omitted when the request is unsorted.
pub fn request_url(base: &Url, request: &FetchRequest) -> Url {
    let mut url = base.clone();
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("page", &request.page.to_string());
        query.append_pair("pageSize", &request.page_size.to_string());
        if let (Some(field), Some(order)) = (request.sort_field.as_deref(), request.sort_order) {
            query.append_pair("sortField", field);
            query.append_pair("sortOrder", order.as_str());
        }
    }
    url
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Vec<T>,
    total: u64,
}

/// Parses a `{"data": [...], "total": n}` response body.
pub fn parse_page<T: DeserializeOwned>(body: &str) -> Result<PageResult<T>, HttpSourceError> {
    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| HttpSourceError::parse_with_body(e.to_string(), body))?;
    Ok(PageResult::new(envelope.data, envelope.total))
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for an [`HttpDataSource`]. The URL is required.
pub struct HttpDataSourceBuilder<T, U> {
    url: U,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    headers: Vec<(String, String)>,
    http_client: Option<Client>,
    _record: PhantomData<fn() -> T>,
}

impl<T> HttpDataSourceBuilder<T, Missing> {
    pub fn new() -> Self {
        Self {
            url: Missing,
            timeout: None,
            connect_timeout: None,
            headers: Vec::new(),
            http_client: None,
            _record: PhantomData,
        }
    }

    /// Sets the list endpoint URL.
    pub fn url(self, url: impl Into<String>) -> HttpDataSourceBuilder<T, Set<String>> {
        HttpDataSourceBuilder {
            url: Set(url.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            headers: self.headers,
            http_client: self.http_client,
            _record: PhantomData,
        }
    }
}

impl<T> Default for HttpDataSourceBuilder<T, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U> HttpDataSourceBuilder<T, U> {
    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Adds a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl<T> HttpDataSourceBuilder<T, Set<String>> {
    /// Builds the source. Fails on an unparsable URL or if the HTTP client
    /// cannot be created.
    pub fn build(self) -> Result<HttpDataSource<T>, HttpSourceError> {
        let raw = self.url.0;
        let base_url =
            Url::parse(&raw).map_err(|e| HttpSourceError::InvalidUrl(format!("{}: {}", raw, e)))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(HttpDataSource {
            inner: Arc::new(HttpDataSourceInner {
                base_url,
                http_client,
                timeout: self.timeout,
                headers: self.headers,
            }),
            _record: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use datagrid::SortState;
    use serde_json::{Value, json};

    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:8080/api/users").unwrap()
    }

    #[test]
    fn test_request_url_without_sort() {
        let url = request_url(&base(), &FetchRequest::new(2, 20));
        assert_eq!(url.as_str(), "http://localhost:8080/api/users?page=2&pageSize=20");
    }

    #[test]
    fn test_request_url_with_sort() {
        let request = FetchRequest::new(1, 10).with_sort(&SortState::descend("created at"));
        let url = request_url(&base(), &request);
        assert_eq!(
            url.query(),
            Some("page=1&pageSize=10&sortField=created+at&sortOrder=descend")
        );
    }

    #[test]
    fn test_request_url_keeps_existing_query() {
        let base = Url::parse("http://localhost/api/users?tenant=7").unwrap();
        let url = request_url(&base, &FetchRequest::new(1, 10));
        assert_eq!(url.query(), Some("tenant=7&page=1&pageSize=10"));
    }

    #[test]
    fn test_parse_page() {
        let page: PageResult<Value> =
            parse_page(r#"{"data": [{"id": 1}, {"id": 2}], "total": 42}"#).unwrap();
        assert_eq!(page.total, 42);
        assert_eq!(page.data, vec![json!({"id": 1}), json!({"id": 2})]);
    }

    #[test]
    fn test_parse_page_rejects_bare_array() {
        let err = parse_page::<Value>("[1, 2]").unwrap_err();
        match err {
            HttpSourceError::Parse { body, .. } => assert_eq!(body.as_deref(), Some("[1, 2]")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_url() {
        let result = HttpDataSource::<Value>::builder().url("not a url").build();
        assert!(matches!(result, Err(HttpSourceError::InvalidUrl(_))));
    }
}
