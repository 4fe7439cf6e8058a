//! HTTP endpoint serving scrapes
//!
//! Each connection is served by hyper on its own task. Every request to the
//! metrics path runs a full collection pass; there is no caching between
//! scrapes.

use hyper::server::conn::Http;
use hyper::service::service_fn;
use hyper::{Body, Method, Request, Response, StatusCode, header};
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::collector::Collector;
use crate::constants::exporter::STATUS_PATH;
use crate::types::MetricsPath;

/// State shared by all HTTP connections
#[derive(Debug, Clone)]
pub struct ExporterState {
    collector: Collector,
    metrics_path: MetricsPath,
}

impl ExporterState {
    #[must_use]
    pub fn new(collector: Collector, metrics_path: MetricsPath) -> Self {
        Self {
            collector,
            metrics_path,
        }
    }

    #[must_use]
    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    #[must_use]
    pub fn metrics_path(&self) -> &MetricsPath {
        &self.metrics_path
    }
}

fn respond(status: StatusCode, content_type: &str, body: impl Into<Body>) -> Response<Body> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(body.into())
        .unwrap_or_default()
}

fn landing_page(metrics_path: &MetricsPath) -> String {
    format!(
        "<html>\n<head><title>IPsec Exporter</title></head>\n<body>\n\
         <h1>IPsec Exporter</h1>\n\
         <p><a href=\"{metrics_path}\">Metrics</a></p>\n\
         <p><a href=\"{STATUS_PATH}\">Status</a></p>\n\
         </body>\n</html>\n"
    )
}

/// Route one request
///
/// - `GET <metrics_path>`: collection pass rendered as Prometheus text
/// - `GET /status`: collection pass as JSON
/// - `GET /`: landing page
/// - anything else: 404
///
/// `HEAD` is routed like `GET`; hyper drops the body.
pub async fn handle_request(
    state: Arc<ExporterState>,
    req: Request<Body>,
) -> Result<Response<Body>, Infallible> {
    if !matches!(*req.method(), Method::GET | Method::HEAD) {
        return Ok(respond(
            StatusCode::METHOD_NOT_ALLOWED,
            "text/plain",
            "method not allowed",
        ));
    }

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    drop(req);
    debug!("{} {}", method, path);

    if path == state.metrics_path.as_str() {
        let snapshot = state.collector.collect().await;
        return Ok(match super::render(&snapshot) {
            Ok(body) => respond(StatusCode::OK, &super::content_type(), body),
            Err(e) => {
                error!("Failed to encode metrics: {}", e);
                respond(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "text/plain",
                    "encoding error",
                )
            }
        });
    }

    Ok(match path.as_str() {
        STATUS_PATH => {
            let snapshot = state.collector.collect().await;
            match serde_json::to_vec_pretty(&snapshot) {
                Ok(body) => respond(StatusCode::OK, "application/json", body),
                Err(e) => {
                    error!("Failed to serialize status: {}", e);
                    respond(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "text/plain",
                        "encoding error",
                    )
                }
            }
        }
        "/" => respond(
            StatusCode::OK,
            "text/html; charset=utf-8",
            landing_page(&state.metrics_path),
        ),
        _ => respond(StatusCode::NOT_FOUND, "text/plain", "not found"),
    })
}

/// Accept HTTP connections on `listener` until `shutdown` resolves
///
/// Connections already being served are left to finish on their own tasks.
pub async fn serve<F>(listener: TcpListener, state: ExporterState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    let state = Arc::new(state);
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            () = &mut shutdown => {
                info!("Shutdown signal received, no longer accepting scrapes");
                return Ok(());
            }
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    continue;
                }
            },
        };

        let state = state.clone();
        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Body>| handle_request(state.clone(), req));
            if let Err(e) = Http::new().serve_connection(stream, service).await {
                debug!("Error serving {}: {}", peer, e);
            }
        });
    }
}
