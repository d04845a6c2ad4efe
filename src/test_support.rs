use std::future::Future;
use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

pub(crate) fn run_async_test<F, T, E>(future: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<&'static str>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|_err| E::from("Failed to build test runtime"))?;
    runtime.block_on(future)
}

/// Status code and body of a raw HTTP/1.1 exchange.
pub(crate) async fn raw_http_request(
    addr: SocketAddr,
    method: &str,
    path: &str,
) -> Result<(u16, String), String> {
    let mut stream = TcpStream::connect(addr)
        .await
        .map_err(|err| format!("connect failed: {}", err))?;
    let request = format!(
        "{} {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        method, path, addr
    );
    stream
        .write_all(request.as_bytes())
        .await
        .map_err(|err| format!("write failed: {}", err))?;
    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .await
        .map_err(|err| format!("read failed: {}", err))?;
    let text = String::from_utf8(response).map_err(|err| format!("invalid utf-8: {}", err))?;
    let (head, body) = text
        .split_once("\r\n\r\n")
        .ok_or_else(|| "missing header terminator".to_owned())?;
    let status = head
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| "missing status".to_owned())?
        .parse::<u16>()
        .map_err(|err| format!("invalid status: {}", err))?;
    Ok((status, body.to_owned()))
}
