//! Static HTTP server for the appseed document tree.
//!
//! Files under the configured root are served unmodified. Two routes are
//! special: `/` always answers with the root's `index.html` and `/redirect`
//! sends a `302` to `/redirect/to.html` so redirect handling can be tested.

mod files;

pub use files::resolve_request_path;

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::appseed_error::AppseedError;
use crate::config::ServerConfig;

pub const REDIRECT_SOURCE: &str = "/redirect";
pub const REDIRECT_TARGET: &str = "/redirect/to.html";

#[derive(Debug)]
struct DocumentRoot {
    path: PathBuf,
}

/// Routes for serving `root`. The directory is not checked here; missing
/// files simply answer 404.
pub fn router(root: impl Into<PathBuf>) -> Router {
    let state = Arc::new(DocumentRoot { path: root.into() });
    Router::new()
        .route("/", get(index))
        .route(REDIRECT_SOURCE, get(redirect))
        .fallback(static_file)
        .with_state(state)
}

async fn index(State(root): State<Arc<DocumentRoot>>) -> Response {
    files::serve_file(&root.path.join("index.html")).await
}

async fn redirect() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, REDIRECT_TARGET)]).into_response()
}

async fn static_file(State(root): State<Arc<DocumentRoot>>, uri: Uri) -> Response {
    match resolve_request_path(&root.path, uri.path()) {
        Some(path) => files::serve_path(path).await,
        None => {
            debug!(path = uri.path(), "rejected path outside document root");
            files::not_found()
        }
    }
}

fn check_root(root: &Path) -> Result<(), AppseedError> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(AppseedError::server_root(root))
    }
}

async fn bind(config: &ServerConfig) -> Result<TcpListener, AppseedError> {
    let addr = config.bind_address();
    TcpListener::bind(addr.as_str())
        .await
        .map_err(|e| AppseedError::server_bind(addr, &e))
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(config: &ServerConfig, shutdown: F) -> Result<(), AppseedError>
where
    F: Future<Output = ()> + Send + 'static,
{
    check_root(&config.root)?;
    let listener = bind(config).await?;
    let local_addr = listener.local_addr()?;
    info!(
        "Appseed server listening on {} (root: {})",
        local_addr,
        config.root.display()
    );

    axum::serve(listener, router(config.root.clone()))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppseedError::server(format!("server error: {}", e)))?;

    info!("Appseed server stopped");
    Ok(())
}

/// Resolves on Ctrl-C. A failure to install the handler is logged and
/// treated as a shutdown request.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
    }
    info!("Shutdown requested");
}

/// A server running on a background task. Dropping it stops the server.
#[derive(Debug)]
pub struct StaticServer {
    local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), std::io::Error>>>,
}

impl StaticServer {
    /// Bind and start serving. Port 0 picks a free port; see
    /// [`StaticServer::local_addr`].
    pub async fn start(config: &ServerConfig) -> Result<Self, AppseedError> {
        check_root(&config.root)?;
        let listener = bind(config).await?;
        let local_addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = router(config.root.clone());
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                    debug!("Static server shutting down gracefully");
                })
                .await
        });

        info!("Static server started on {}", local_addr);
        Ok(Self {
            local_addr,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Signal shutdown and wait for in-flight requests to finish.
    pub async fn stop(mut self) -> Result<(), AppseedError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        match self.task.take() {
            Some(task) => match task.await {
                Ok(result) => result.map_err(AppseedError::from),
                Err(e) => Err(AppseedError::server(format!("server task failed: {}", e))),
            },
            None => Ok(()),
        }
    }
}

impl Drop for StaticServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
