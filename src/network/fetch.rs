//! Remote table retrieval over a plain HTTP GET.

use crate::core::DbError;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Fetches `http://host[:port]/path` and returns the response body, or a
/// descriptive `NetworkFailure` (bad status line, connection refused, ...)
/// that the caller surfaces verbatim.
pub async fn fetch_url(url: &str) -> Result<String, DbError> {
    let (host, port, path) = split_url(url)?;

    let mut stream = TcpStream::connect((host.as_str(), port))
        .await
        .map_err(|_| {
            DbError::NetworkFailure(format!("Unable to connect to {host} at port {port}"))
        })?;
    stream
        .write_all(
            format!("GET {path} HTTP/1.1\r\nHost: {host}\r\nConnection: Close\r\n\r\n").as_bytes(),
        )
        .await?;

    let mut reader = BufReader::new(stream);
    let mut status = String::new();
    reader.read_line(&mut status).await?;
    if !status.contains("200 OK") {
        return Err(DbError::NetworkFailure(format!(
            "Error ({}) getting {path} from {host} at port {port}",
            status.trim()
        )));
    }

    // Drain the remaining headers; the body follows the blank line.
    let mut header = String::new();
    loop {
        header.clear();
        let n = reader.read_line(&mut header).await?;
        if n == 0 || header == "\r\n" || header == "\n" {
            break;
        }
    }

    let mut body = String::new();
    reader.read_to_string(&mut body).await?;
    Ok(body)
}

fn split_url(url: &str) -> Result<(String, u16, String), DbError> {
    let rest = url
        .strip_prefix("http://")
        .ok_or_else(|| DbError::NetworkFailure(format!("Unsupported URL: {url}")))?;
    let (authority, path) = match rest.split_once('/') {
        Some((authority, path)) => (authority, format!("/{path}")),
        None => (rest, "/".to_string()),
    };
    let (host, port) = match authority.split_once(':') {
        Some((host, port)) => (
            host.to_string(),
            port.parse::<u16>()
                .map_err(|_| DbError::NetworkFailure(format!("Bad port in URL: {url}")))?,
        ),
        None => (authority.to_string(), 80),
    };
    if host.is_empty() {
        return Err(DbError::NetworkFailure(format!("Bad host in URL: {url}")));
    }
    Ok((host, port, path))
}
