//! HTTP Server

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use zucchina_core::config::ServerConfig;
use zucchina_core::Fetch;

use crate::handlers;

/// Header carrying the client's country when no `c` query parameter is given
const COUNTRY_HEADER: &str = "country-code";

/// Shared request state
pub struct AppState {
    pub config: ServerConfig,
    pub fetcher: Arc<dyn Fetch>,
}

impl AppState {
    pub fn new(config: ServerConfig, fetcher: Arc<dyn Fetch>) -> Self {
        Self { config, fetcher }
    }
}

/// Bind `addr` and serve requests until the process exits
pub async fn run_server(addr: SocketAddr, state: Arc<AppState>) -> zucchina_core::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| zucchina_core::Error::Server(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("🌐 Listening on http://{}", addr);

    serve(listener, state).await
}

/// Serve requests from an already bound listener
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> zucchina_core::Result<()> {
    loop {
        let (stream, _) = match listener.accept().await {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Accept error: {}", e);
                continue;
            }
        };

        let io = TokioIo::new(stream);
        let state = state.clone();

        tokio::task::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .serve_connection(io, service_fn(move |req| handle_request(req, state.clone())))
                .await
            {
                tracing::error!("Error serving connection: {:?}", err);
            }
        });
    }
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let country = country(&req, &state.config.default_country);

    let response = match (method, path.as_str()) {
        (Method::GET, "/health") => handlers::health_check(),
        (Method::GET, path) => match token(path) {
            Some(token) => handlers::render_document(&state, token, &country).await,
            None => handlers::text_response(StatusCode::NOT_FOUND, "Not Found"),
        },
        _ => handlers::text_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"),
    };

    Ok(response)
}

/// The single path segment of `/:token`
fn token(path: &str) -> Option<&str> {
    let token = path.strip_prefix('/')?;
    if token.is_empty() || token.contains('/') {
        return None;
    }
    Some(token)
}

/// Country hint: `c` query parameter, then the country header, then the default
fn country<B>(req: &Request<B>, default: &str) -> String {
    let from_query = req.uri().query().and_then(|query| {
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "c")
            .map(|(_, value)| value.into_owned())
    });

    from_query
        .or_else(|| {
            req.headers()
                .get(COUNTRY_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .unwrap_or_else(|| default.to_string())
}
