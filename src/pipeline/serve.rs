// src/pipeline/serve.rs

//! HTTP serving of robots.txt, sitemap.xml and head fragments.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::services::SiteSurface;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_XML: &str = "application/xml; charset=utf-8";
const TEXT_HTML: &str = "text/html; charset=utf-8";

type SharedSurface = Arc<SiteSurface>;

/// Build the router serving one site surface.
pub fn router(surface: SharedSurface) -> Router {
    Router::new()
        .route("/robots.txt", get(robots_txt))
        .route("/sitemap.xml", get(sitemap_xml))
        .route("/head", get(head_fragment))
        .with_state(surface)
}

/// Bind and serve until Ctrl-C.
pub async fn run_server(surface: SharedSurface, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    log::info!(
        "Serving crawl-control files for {} on http://{}",
        surface.base,
        listener.local_addr()?
    );

    axum::serve(listener, router(surface))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for Ctrl-C: {}", e);
    }
    log::info!("Shutdown signal received");
}

async fn robots_txt(State(surface): State<SharedSurface>, headers: HeaderMap) -> Response {
    log::debug!("GET /robots.txt");
    respond(&headers, TEXT_PLAIN, surface.robots.render())
}

async fn sitemap_xml(State(surface): State<SharedSurface>, headers: HeaderMap) -> Response {
    log::debug!("GET /sitemap.xml");
    match surface.sitemap.render() {
        Ok(body) => respond(&headers, APPLICATION_XML, body),
        Err(e) => {
            log::error!("Sitemap rendering failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct HeadQuery {
    path: Option<String>,
}

async fn head_fragment(
    State(surface): State<SharedSurface>,
    Query(query): Query<HeadQuery>,
    headers: HeaderMap,
) -> Response {
    let path = query.path.as_deref().unwrap_or("/");
    log::debug!("GET /head?path={}", path);
    respond(&headers, TEXT_HTML, surface.metadata.render_for(path))
}

/// Strong ETag over the response body.
fn etag(body: &str) -> String {
    format!("\"{}\"", hex::encode(Sha256::digest(body.as_bytes())))
}

fn matches_etag(headers: &HeaderMap, tag: &str) -> bool {
    headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| {
            v.split(',').any(|candidate| {
                let candidate = candidate.trim();
                candidate == "*" || candidate.trim_start_matches("W/") == tag
            })
        })
}

fn respond(headers: &HeaderMap, content_type: &'static str, body: String) -> Response {
    let tag = etag(&body);

    if matches_etag(headers, &tag) {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, tag)]).into_response();
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::ETAG, tag),
        ],
        body,
    )
        .into_response()
}
