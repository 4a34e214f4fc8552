//! Convenience HTTP server exposing a single health endpoint.
//!
//! Most services should mount a [`Responder`](crate::Responder) inside their
//! existing router and never touch this module. It exists for sidecar-style
//! deployments where the health endpoint *is* the whole server: bind a port,
//! answer the configured path, 404 everything else.
//!
//! # Graceful shutdown and Kubernetes
//!
//! When Kubernetes terminates a pod it sends **SIGTERM** and waits
//! `terminationGracePeriodSeconds` (default 30 s) before SIGKILL. The server
//! reacts by immediately stopping `listener.accept()`, letting in-flight
//! connections run to completion, and then returning from [`Server::serve`].

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::error::Error;
use crate::responder::Responder;

/// Default endpoint path when [`Server::route`] is not called.
pub const DEFAULT_ROUTE: &str = "/health";

/// A standalone server for one health endpoint.
///
/// ```rust,no_run
/// use vitals::{Responder, Server};
///
/// # async fn run() {
/// Server::bind("0.0.0.0:3000")
///     .route("/healthz")
///     .serve(Responder::new())
///     .await
///     .unwrap();
/// # }
/// ```
pub struct Server {
    addr: SocketAddr,
    path: String,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called. The endpoint path defaults to [`DEFAULT_ROUTE`].
    ///
    /// # Panics
    ///
    /// Panics if `addr` is not a valid `host:port` string.
    pub fn bind(addr: &str) -> Self {
        let addr: SocketAddr = addr.parse().expect("invalid socket address");
        Self { addr, path: DEFAULT_ROUTE.to_owned() }
    }

    /// Changes the endpoint path. Returns `self` for chaining.
    pub fn route(mut self, path: &str) -> Self {
        self.path = path.to_owned();
        self
    }

    /// Starts accepting connections and answering health-check requests.
    ///
    /// Any method on the configured path invokes the responder; every other
    /// path gets an empty 404. Returns only after a full graceful shutdown
    /// (SIGTERM or Ctrl-C, followed by all in-flight requests completing).
    pub async fn serve(self, responder: Responder) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;

        let responder = Arc::new(responder);
        let path: Arc<str> = Arc::from(self.path);

        info!(addr = %self.addr, route = %path, "health endpoint listening");

        // JoinSet tracks every spawned connection task so graceful shutdown
        // can wait for all of them.
        let mut tasks = tokio::task::JoinSet::new();

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Check shutdown first so a SIGTERM immediately stops
                // accepting, even with connections queued.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let responder = Arc::clone(&responder);
                    let path = Arc::clone(&path);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        let svc = service_fn(move |req| {
                            let responder = Arc::clone(&responder);
                            let path = Arc::clone(&path);
                            async move { dispatch(responder, &path, req).await }
                        });

                        // auto::Builder handles both HTTP/1.1 and HTTP/2,
                        // whatever the client negotiates.
                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet does not grow
                // without bound.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("health endpoint stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Routes one request: the health path goes to the responder, everything else
/// gets 404. The error type is [`Infallible`](std::convert::Infallible) — the
/// responder resolves every failure into a response, so hyper never sees one.
async fn dispatch(
    responder: Arc<Responder>,
    path: &str,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<http::Response<Full<Bytes>>, std::convert::Infallible> {
    if req.uri().path() == path {
        return Ok(responder.respond().await);
    }

    let mut response = http::Response::new(Full::new(Bytes::new()));
    *response.status_mut() = StatusCode::NOT_FOUND;
    Ok(response)
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both **SIGTERM** (sent by the Kubernetes control
/// plane) and **SIGINT** (Ctrl-C, for local dev). On Windows only Ctrl-C is
/// available.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
