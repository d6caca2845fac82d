//! HTTP server rendering pages on each request

use anyhow::Result;
use axum::{
    extract::{Path, State},
    handler::Handler,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::pages::{Pages, Rendered};
use crate::Site;

/// Shared, read-only request state
pub struct AppState {
    pages: Pages,
    public_dir: PathBuf,
    analyze: bool,
}

impl AppState {
    pub fn new(pages: Pages, public_dir: PathBuf) -> Self {
        Self {
            pages,
            public_dir,
            analyze: false,
        }
    }

    /// Trace every request
    pub fn with_analyze(mut self, analyze: bool) -> Self {
        self.analyze = analyze;
        self
    }

    fn page(&self, result: Result<String>) -> Response {
        match result {
            Ok(html) => Html(html).into_response(),
            Err(e) => self.failure(e),
        }
    }

    fn failure(&self, err: anyhow::Error) -> Response {
        tracing::error!("Failed to render page: {:#}", err);
        let html = self.pages.error_page().unwrap_or_else(|e| {
            tracing::error!("Failed to render error page: {}", e);
            "Internal Server Error".to_string()
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response()
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let not_found = not_found_handler.with_state(state.clone());
    let assets = ServeDir::new(&state.public_dir).not_found_service(not_found);

    let app = Router::new()
        .route("/", get(home_handler))
        .route("/about", get(about_handler))
        .route("/blog", get(blog_index_handler))
        .route("/blog/:slug", get(blog_post_handler))
        .fallback_service(assets)
        .with_state(state.clone());

    if state.analyze {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    }
}

/// Start the server and block until shutdown
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let pages = site.pages()?;
    let state = Arc::new(
        AppState::new(pages, site.public_dir.clone()).with_analyze(site.config.analyze),
    );
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        "Serving {} at http://{}:{} ({} backend)",
        site.config.title,
        ip,
        port,
        site.config.content.backend
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn home_handler(State(state): State<Arc<AppState>>) -> Response {
    let result = state.pages.home().await;
    state.page(result)
}

async fn about_handler(State(state): State<Arc<AppState>>) -> Response {
    let result = state.pages.about().await;
    state.page(result)
}

async fn blog_index_handler(State(state): State<Arc<AppState>>) -> Response {
    let result = state.pages.blog_index().await;
    state.page(result)
}

async fn blog_post_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    match state.pages.blog_post(&slug).await {
        Ok(Rendered::Page(html)) => Html(html).into_response(),
        Ok(Rendered::NotFound(html)) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => state.failure(e),
    }
}

async fn not_found_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.pages.not_found() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => state.failure(e),
    }
}
