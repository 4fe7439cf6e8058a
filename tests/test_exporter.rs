//! Tests for the HTTP exporter
//!
//! Routing is exercised through `handle_request` directly; one test runs the
//! full accept loop over a real socket.

use anyhow::Result;
use hyper::{Body, Method, Request, StatusCode};
use ipsec_exporter::exporter::handle_request;
use ipsec_exporter::{AuthMode, Collector, ExporterState, MetricsPath, serve};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::time::{Duration, timeout};

use test_helpers::*;

fn state(metrics_path: &str) -> Arc<ExporterState> {
    let source = Arc::new(
        ScriptedSource::new()
            .with_output("rw", EAP_TWO_PEERS)
            .with_output("vpn1", PSK_INSTALLED),
    );
    let collector = Collector::new(
        vec![
            connection("rw", AuthMode::Eap),
            connection("vpn1", AuthMode::CertificateOrPsk),
            connection("down", AuthMode::CertificateOrPsk),
        ],
        source,
    );
    Arc::new(ExporterState::new(
        collector,
        MetricsPath::new(metrics_path.to_string()).unwrap(),
    ))
}

async fn get(state: Arc<ExporterState>, path: &str) -> Result<(StatusCode, String, String)> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())?;
    let response = handle_request(state, request).await?;
    let status = response.status();
    let content_type = response
        .headers()
        .get(hyper::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = hyper::body::to_bytes(response.into_body()).await?;
    Ok((status, content_type, String::from_utf8(body.to_vec())?))
}

/// Test the metrics path renders every user record
#[tokio::test]
async fn test_metrics_endpoint() -> Result<()> {
    let (status, content_type, body) = get(state("/metrics"), "/metrics").await?;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/plain"));
    assert!(body.contains(r#"ipsec_up{tunnel="rw",user="alice"} 1"#));
    assert!(body.contains(r#"ipsec_in_bytes{tunnel="rw",user="bob"} 8100"#));
    assert!(body.contains(r#"ipsec_out_packets{tunnel="vpn1",user="alice"} 20"#));
    assert!(body.contains(r#"ipsec_tunnel_status{tunnel="vpn1",user=""} 0"#));
    // Unreachable connections stay visible as down
    assert!(body.contains(r#"ipsec_up{tunnel="down",user=""} 0"#));
    assert!(body.contains(r#"ipsec_tunnel_status{tunnel="down",user=""} 3"#));

    Ok(())
}

/// Test a custom metrics path replaces the default
#[tokio::test]
async fn test_custom_metrics_path() -> Result<()> {
    let state = state("/probe");

    let (status, _, body) = get(state.clone(), "/probe").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("ipsec_up"));

    let (status, _, _) = get(state, "/metrics").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

/// Test the JSON status endpoint
#[tokio::test]
async fn test_status_endpoint() -> Result<()> {
    let (status, content_type, body) = get(state("/metrics"), "/status").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/json");
    let json: serde_json::Value = serde_json::from_str(&body)?;
    assert_eq!(json["tunnels"]["down"]["up"], false);
    assert_eq!(json["users"]["rw"]["bob"]["bytes_out"], 9900);

    Ok(())
}

/// Test the landing page links to the metrics path
#[tokio::test]
async fn test_landing_page() -> Result<()> {
    let (status, content_type, body) = get(state("/probe"), "/").await?;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/html"));
    assert!(body.contains(r#"href="/probe""#));

    Ok(())
}

/// Test unknown paths and methods
#[tokio::test]
async fn test_not_found_and_method() -> Result<()> {
    let (status, _, _) = get(state("/metrics"), "/nope").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/metrics")
        .body(Body::empty())?;
    let response = handle_request(state("/metrics"), request).await?;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    Ok(())
}

/// Test scrape health checks sending HEAD are answered like GET
#[tokio::test]
async fn test_head_metrics() -> Result<()> {
    let request = Request::builder()
        .method(Method::HEAD)
        .uri("/metrics")
        .body(Body::empty())?;
    let response = handle_request(state("/metrics"), request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .method(Method::HEAD)
        .uri("/nope")
        .body(Body::empty())?;
    let response = handle_request(state("/metrics"), request).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Test the accept loop serves a scrape and stops on shutdown
#[tokio::test]
async fn test_serve_over_tcp() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = Arc::try_unwrap(state("/metrics")).unwrap();

    let (stop, stopped) = oneshot::channel::<()>();
    let server = tokio::spawn(serve(listener, state, async move {
        let _ = stopped.await;
    }));

    let mut stream = TcpStream::connect(addr).await?;
    stream
        .write_all(b"GET /metrics HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await?;
    let mut response = Vec::new();
    timeout(Duration::from_secs(5), stream.read_to_end(&mut response)).await??;
    let response = String::from_utf8(response)?;

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains(r#"ipsec_in_bytes{tunnel="rw",user="alice"} 52344"#));

    stop.send(()).unwrap();
    timeout(Duration::from_secs(5), server).await???;

    Ok(())
}
