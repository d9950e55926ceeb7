// src/reload/mod.rs

//! Live reload channel.
//!
//! Connected browser sessions are plain WebSockets held in a
//! [`ClientRegistry`]; after a successful re-run the runtime pushes a
//! [`ReloadMessage`] to every session. Notification is fire-and-forget: a
//! run's success never depends on delivery, and sessions that disconnect
//! mid-notify are silently dropped.
//!
//! [`server`] also hosts the plain HTTP dev server for the output tree.

pub mod message;
pub mod registry;
pub mod server;

pub use message::{ReloadKind, ReloadMessage};
pub use registry::{ClientRegistry, ReloadSink};
pub use server::{reserve_ws_port, spawn_http_server, spawn_ws_acceptor};

/// Browser-side client applying the reload protocol: swap style sheets in
/// place, fall back to a full page reload for everything else.
pub fn client_script(ws_port: u16) -> String {
    format!(
        r#"(() => {{
  const socket = new WebSocket("ws://127.0.0.1:{ws_port}/");
  socket.addEventListener("message", (event) => {{
    let message;
    try {{ message = JSON.parse(event.data); }} catch {{ return; }}
    if (message.kind === "style-swap") {{
      for (const link of document.querySelectorAll('link[rel="stylesheet"]')) {{
        const url = new URL(link.href);
        url.searchParams.set("v", Date.now().toString());
        link.href = url.toString();
      }}
    }} else {{
      window.location.reload();
    }}
  }});
}})();"#
    )
}
