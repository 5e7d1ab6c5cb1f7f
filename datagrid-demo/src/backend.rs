//! In-process mock backend serving the user list over HTTP.
//!
//! `GET /api/users?page=&pageSize=&sortField=&sortOrder=` answers with a
//! `{"data": [...], "total": n}` page. `DELETE /api/users/{id}` removes a
//! record.

use std::convert::Infallible;
use std::io;
use std::net::SocketAddr;

use datagrid::{FetchRequest, MemorySource, SortOrder};
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub const USERS_PATH: &str = "/api/users";

/// Mock backend bound to a local port.
pub struct Backend {
    listener: TcpListener,
    store: MemorySource<Value>,
}

impl Backend {
    /// Bind to an ephemeral port on localhost.
    pub async fn bind(store: MemorySource<Value>) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Ok(Self { listener, store })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve connections until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        loop {
            let (stream, peer) = tokio::select! {
                _ = cancel.cancelled() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        log::warn!("Accept failed: {}", e);
                        continue;
                    }
                },
            };
            log::trace!("Connection from {}", peer);

            let store = self.store.clone();
            let service = service_fn(move |req: Request<Incoming>| {
                let store = store.clone();
                async move { Ok::<_, Infallible>(handle(&store, &req)) }
            });
            tokio::spawn(async move {
                if let Err(e) = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await
                {
                    log::debug!("Connection closed with error: {}", e);
                }
            });
        }
        log::info!("Backend stopped");
    }
}

fn handle<B>(store: &MemorySource<Value>, req: &Request<B>) -> Response<Full<Bytes>> {
    let path = req.uri().path();
    log::debug!("{} {}", req.method(), req.uri());

    match (req.method(), path) {
        (&Method::GET, USERS_PATH) => {
            let request = parse_request(req.uri().query().unwrap_or_default());
            let page = store.page(&request);
            json_response(StatusCode::OK, &json!({"data": page.data, "total": page.total}))
        }
        (&Method::DELETE, _) => match user_id(path) {
            None => not_found(),
            Some("") => json_response(StatusCode::BAD_REQUEST, &json!({"error": "missing id"})),
            Some(id) => match store.remove_where("id", id) {
                0 => json_response(StatusCode::NOT_FOUND, &json!({"error": "no such user"})),
                removed => json_response(StatusCode::OK, &json!({"removed": removed})),
            },
        },
        _ => not_found(),
    }
}

/// The `{id}` segment of `/api/users/{id}`.
fn user_id(path: &str) -> Option<&str> {
    path.strip_prefix(USERS_PATH)?.strip_prefix('/')
}

fn not_found() -> Response<Full<Bytes>> {
    json_response(StatusCode::NOT_FOUND, &json!({"error": "not found"}))
}

/// Reads the page request from a list query string. Missing or malformed
/// values fall back to page 1 of 10, unsorted.
fn parse_request(query: &str) -> FetchRequest {
    let mut request = FetchRequest::new(1, 10);
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "page" => request.page = value.parse::<u32>().unwrap_or(1).max(1),
            "pageSize" => request.page_size = value.parse::<u32>().unwrap_or(10).max(1),
            "sortField" => request.sort_field = Some(value.into_owned()),
            "sortOrder" => request.sort_order = SortOrder::parse(&value),
            _ => {}
        }
    }
    if request.sort_field.is_none() || request.sort_order.is_none() {
        request.sort_field = None;
        request.sort_order = None;
    }
    request
}

fn json_response(status: StatusCode, body: &Value) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response.headers_mut().insert(
        hyper::header::CONTENT_TYPE,
        hyper::header::HeaderValue::from_static("application/json"),
    );
    response
}
