//! Test helpers.

use crate::prelude_errors::*;
use serde_json::json;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;

/// Initialize logging.
pub fn init_logger() -> Fallible<()> {
    env_logger::try_init_from_env(env_logger::Env::default())?;
    Ok(())
}

/// Initialize a tokio runtime for tests, with logging.
pub fn init_runtime() -> Fallible<Runtime> {
    let _ = init_logger();
    Runtime::new().context("could not build tokio runtime")
}

/// Render a registry error envelope carrying a single error.
pub fn registry_error_body(code: &str, message: &str) -> String {
    json!({
        "errors": [{ "code": code, "message": message }]
    })
    .to_string()
}

/// Render a tag list response body.
pub fn tag_list_body(name: &str, tags: &[&str]) -> String {
    json!({ "name": name, "tags": tags }).to_string()
}

/// Start a TCP server on `rt` which accepts connections but never answers.
///
/// Requests sent to the returned address stay pending until the client gives up.
pub fn unresponsive_server(rt: &Runtime) -> Fallible<SocketAddr> {
    let listener = rt.block_on(TcpListener::bind("127.0.0.1:0"))?;
    let addr = listener.local_addr()?;

    rt.spawn(async move {
        let mut held = Vec::new();
        loop {
            match listener.accept().await {
                Ok((socket, peer)) => {
                    trace!("holding connection from {}", peer);
                    held.push(socket);
                }
                Err(e) => {
                    debug!("unresponsive server stopped: {}", e);
                    break;
                }
            }
        }
    });

    Ok(addr)
}
