use std::time::Duration;

use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::{AgentError, AppError, AppResult};
use crate::shutdown::ShutdownReceiver;

use super::snapshot::SnapshotStore;

const MAX_REQUEST_BYTES: usize = 1024 * 1024;
/// Time a client gets to send its request headers.
const REQUEST_READ_TIMEOUT: Duration = Duration::from_secs(10);
/// Time in-flight requests get to finish after shutdown.
const DRAIN_GRACE: Duration = Duration::from_secs(10);

pub(super) struct HttpRequest {
    pub(super) method: String,
    pub(super) path: String,
}

#[derive(Debug)]
pub(super) struct RequestError {
    pub(super) status: u16,
    pub(super) message: String,
}

impl RequestError {
    pub(super) fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

pub(super) async fn read_http_request(
    socket: &mut TcpStream,
) -> Result<HttpRequest, RequestError> {
    let mut buffer: Vec<u8> = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    let header_end;

    loop {
        let bytes = socket
            .read(&mut chunk)
            .await
            .map_err(|err| RequestError::new(400, format!("Failed to read request: {}", err)))?;
        if bytes == 0 {
            return Err(RequestError::new(400, "Empty request"));
        }
        let read_slice = chunk
            .get(..bytes)
            .ok_or_else(|| RequestError::new(400, "Invalid read length"))?;
        buffer.extend_from_slice(read_slice);
        if buffer.len() > MAX_REQUEST_BYTES {
            return Err(RequestError::new(413, "Request too large"));
        }
        if let Some(pos) = find_header_end(&buffer) {
            header_end = pos;
            break;
        }
    }

    let header_bytes = buffer
        .get(..header_end)
        .ok_or_else(|| RequestError::new(400, "Malformed request headers"))?;
    let header_text = std::str::from_utf8(header_bytes)
        .map_err(|err| RequestError::new(400, format!("Invalid request encoding: {}", err)))?;
    let request_line = header_text
        .split("\r\n")
        .next()
        .ok_or_else(|| RequestError::new(400, "Missing request line"))?;
    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| RequestError::new(400, "Missing HTTP method"))?;
    let target = parts
        .next()
        .ok_or_else(|| RequestError::new(400, "Missing request path"))?;
    let path = target.split_once('?').map_or(target, |(path, _query)| path);

    Ok(HttpRequest {
        method: method.to_owned(),
        path: path.to_owned(),
    })
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

const fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        413 => "Payload Too Large",
        _ => "Internal Server Error",
    }
}

async fn write_error_response(
    socket: &mut TcpStream,
    status: u16,
    message: &str,
) -> AppResult<()> {
    #[derive(Serialize)]
    struct ErrorResponse<'msg> {
        error: &'msg str,
    }
    let body = serde_json::to_vec(&ErrorResponse { error: message }).map_err(|err| {
        AppError::agent(AgentError::Serialize {
            context: "error response",
            source: err,
        })
    })?;
    write_response(socket, status, &body).await
}

async fn write_response(socket: &mut TcpStream, status: u16, body: &[u8]) -> AppResult<()> {
    let allow = if status == 405 { "Allow: GET\r\n" } else { "" };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        status,
        status_text(status),
        body.len(),
        allow
    );
    socket.write_all(response.as_bytes()).await.map_err(|err| {
        AppError::agent(AgentError::Io {
            context: "write response",
            source: err,
        })
    })?;
    socket.write_all(body).await.map_err(|err| {
        AppError::agent(AgentError::Io {
            context: "write response body",
            source: err,
        })
    })?;
    socket.shutdown().await.map_err(|err| {
        AppError::agent(AgentError::Io {
            context: "close connection",
            source: err,
        })
    })
}

async fn handle_connection(mut socket: TcpStream, mut store: SnapshotStore) -> AppResult<()> {
    let request = match tokio::time::timeout(REQUEST_READ_TIMEOUT, read_http_request(&mut socket))
        .await
    {
        Ok(Ok(request)) => request,
        Ok(Err(err)) => return write_error_response(&mut socket, err.status, &err.message).await,
        Err(_elapsed) => {
            return write_error_response(&mut socket, 408, "Timed out reading request").await;
        }
    };

    if request.path != "/" {
        return write_error_response(&mut socket, 404, "Not found").await;
    }
    if request.method != "GET" {
        return write_error_response(&mut socket, 405, "Only GET is supported").await;
    }

    let body = serde_json::to_vec(store.report()).map_err(|err| {
        AppError::agent(AgentError::Serialize {
            context: "node report",
            source: err,
        })
    })?;
    write_response(&mut socket, 200, &body).await
}

/// Serves the current snapshot on `listener` until shutdown.
///
/// After shutdown no new connections are accepted; requests already being
/// handled get [`DRAIN_GRACE`] to finish before they are aborted. Accept
/// errors are logged and do not stop the loop.
pub async fn serve(
    listener: TcpListener,
    store: SnapshotStore,
    mut shutdown_rx: ShutdownReceiver,
) {
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            biased;
            _ = shutdown_rx.recv() => break,
            accepted = listener.accept() => {
                match accepted {
                    Ok((socket, peer)) => {
                        let store = store.clone();
                        connections.spawn(async move {
                            if let Err(err) = handle_connection(socket, store).await {
                                debug!("Request from {} failed: {}", peer, err);
                            }
                        });
                    }
                    Err(err) => warn!("Failed to accept connection: {}", err),
                }
            }
            Some(joined) = connections.join_next(), if !connections.is_empty() => {
                if let Err(err) = joined {
                    warn!("Request task failed: {}", err);
                }
            }
        }
    }

    let pending = connections.len();
    if pending > 0 {
        info!("Waiting for {} in-flight requests", pending);
    }
    let drained = tokio::time::timeout(DRAIN_GRACE, async {
        while connections.join_next().await.is_some() {}
    })
    .await;
    if drained.is_err() {
        warn!("Aborting {} requests still running after shutdown", connections.len());
        connections.abort_all();
    }
}
