// src/reload/server.rs

//! WebSocket acceptor and HTTP dev server.

use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

use axum::Router;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use crate::errors::Result;
use crate::reload::registry::ClientRegistry;

/// Conventional live reload port.
const PREFERRED_WS_PORT: u16 = 35729;

/// Bind the live reload listener, preferring the conventional port and
/// falling back to an ephemeral one.
pub fn reserve_ws_port() -> Result<(TcpListener, u16)> {
    let listener = match TcpListener::bind(("127.0.0.1", PREFERRED_WS_PORT)) {
        Ok(sock) => sock,
        Err(_) => TcpListener::bind(("127.0.0.1", 0))?,
    };

    let port = listener.local_addr()?.port();
    Ok((listener, port))
}

/// Accept WebSocket sessions on a dedicated thread, handing each one to the
/// registry. The thread lives for the rest of the process.
pub fn spawn_ws_acceptor(
    listener: TcpListener,
    registry: Arc<ClientRegistry>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    warn!("live reload accept failed: {e}");
                    continue;
                }
            };
            match tungstenite::accept(stream) {
                Ok(socket) => registry.register(Box::new(socket)),
                Err(e) => warn!("live reload handshake failed: {e}"),
            }
        }
    })
}

/// Serve the output tree over HTTP on the configured port.
pub fn spawn_http_server(output: PathBuf, port: u16) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = serve(output, port).await {
            error!("dev server stopped: {e}");
        }
    })
}

async fn serve(output: PathBuf, port: u16) -> anyhow::Result<()> {
    let address = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(address).await?;

    info!("serving {} on http://localhost:{port}/", output.display());

    let router = Router::new().fallback_service(ServeDir::new(output));
    axum::serve(listener, router).await?;

    Ok(())
}
