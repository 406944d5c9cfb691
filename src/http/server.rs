//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum Router with the single catch-all handler
//! - Wire up middleware (request id, tracing, access log, Server header)
//! - Bind the server to a listener, with or without TLS
//! - Drain in-flight exchanges when shutdown is requested

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use axum_server::Handle;
use thiserror::Error;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::files::{FileService, RequestContext};
use crate::http::request::access_log;
use crate::lifecycle::{signals, Shutdown};
use crate::net::tls::{load_tls_config, TlsError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub files: Arc<FileService>,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Tls(#[from] TlsError),
    #[error("Application name {0:?} is not a valid Server header value")]
    InvalidAppName(String),
}

/// HTTP file server.
pub struct HttpServer {
    router: Router,
    config: Arc<ServerConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails if the root directory cannot be canonicalized.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let config = Arc::new(config);
        let server_name = HeaderValue::from_str(&config.app_name)
            .map_err(|_| ServerError::InvalidAppName(config.app_name.clone()))?;

        let state = AppState {
            files: Arc::new(FileService::new(config.clone())?),
        };

        let router = Self::build_router(state, server_name);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The request id is assigned outermost so the access log and the trace
    /// span both see it.
    fn build_router(state: AppState, server_name: HeaderValue) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(middleware::from_fn(access_log))
            .layer(SetResponseHeaderLayer::overriding(header::SERVER, server_name))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(DefaultBodyLimit::disable())
    }

    /// A clone of the fully layered router, for driving requests in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires or the process
    /// receives a termination signal.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), ServerError> {
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;

        let handle = Handle::new();
        let grace = Duration::from_secs(self.config.shutdown_grace_secs);
        tokio::spawn(watch_shutdown(handle.clone(), shutdown, grace));

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        match &self.config.tls {
            Some(tls) => {
                let rustls = load_tls_config(tls).await?;
                tracing::info!(address = %addr, root = ?self.config.root, "HTTPS server starting");
                axum_server::tls_rustls::from_tcp_rustls(listener, rustls)
                    .handle(handle)
                    .serve(app)
                    .await?;
            }
            None => {
                tracing::info!(address = %addr, root = ?self.config.root, "HTTP server starting");
                axum_server::from_tcp(listener)
                    .handle(handle)
                    .serve(app)
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

async fn watch_shutdown(handle: Handle, shutdown: Shutdown, grace: Duration) {
    tokio::select! {
        _ = shutdown.triggered() => {
            tracing::info!("Shutdown requested");
        }
        name = signals::wait_for_signal() => {
            tracing::info!(signal = name, "Received signal, starting graceful shutdown");
        }
    }
    handle.graceful_shutdown(Some(grace));
}

/// Route every exchange by method. Unknown methods succeed without effect.
async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let path = uri.path();
    let result = match method {
        Method::GET => {
            let ctx = RequestContext {
                path,
                query: uri.query(),
                headers: &headers,
            };
            state.files.serve(&ctx).await
        }
        Method::POST => state.files.upload(path, &headers, body).await,
        Method::DELETE => state.files.remove(path).await,
        _ => Ok(StatusCode::OK.into_response()),
    };

    result.unwrap_or_else(IntoResponse::into_response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use tower::ServiceExt;

    fn config_for(root: &std::path::Path) -> ServerConfig {
        ServerConfig {
            root: root.to_path_buf(),
            ..ServerConfig::default()
        }
    }

    #[tokio::test]
    async fn server_header_and_request_id_are_set() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        let server = HttpServer::new(ServerConfig {
            app_name: "myfiles".into(),
            ..config_for(dir.path())
        })
        .unwrap();

        let response = server
            .router()
            .oneshot(Request::get("/a.txt").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::SERVER], "myfiles");
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn unknown_methods_are_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let server = HttpServer::new(config_for(dir.path())).unwrap();

        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri("/nothing-here")
                    .body(Body::from("ignored"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(!dir.path().join("nothing-here").exists());
    }

    #[test]
    fn missing_root_is_rejected() {
        let config = config_for(std::path::Path::new("/definitely/not/a/root"));
        assert!(matches!(HttpServer::new(config), Err(ServerError::Io(_))));
    }

    #[test]
    fn unprintable_app_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            app_name: "bad\nname".into(),
            ..config_for(dir.path())
        };
        assert!(matches!(
            HttpServer::new(config),
            Err(ServerError::InvalidAppName(_))
        ));
    }
}
