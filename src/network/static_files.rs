//! Static file responses for non-query requests.

use std::path::Path;

/// Builds a complete response for `path` under `doc_root`: 200 with the file
/// contents, or a plain-text 404 when it is missing or escapes the root.
pub async fn response(doc_root: &str, path: &str) -> Vec<u8> {
    let relative = path.trim_start_matches('/');
    if relative.is_empty() || relative.split('/').any(|part| part == "..") {
        return not_found(path);
    }

    let full = Path::new(doc_root).join(relative);
    match tokio::fs::read(&full).await {
        Ok(contents) => {
            let mut response = format!(
                "HTTP/1.1 200 OK\r\n\
                 Server: featherql\r\n\
                 Connection: Close\r\n\
                 Content-Type: {}\r\n\
                 Content-Length: {}\r\n\r\n",
                content_type(&full),
                contents.len()
            )
            .into_bytes();
            response.extend_from_slice(&contents);
            response
        }
        Err(_) => not_found(path),
    }
}

fn not_found(path: &str) -> Vec<u8> {
    let body = format!("The requested path {path} was not found.\n");
    format!(
        "HTTP/1.1 404 Not Found\r\n\
         Server: featherql\r\n\
         Connection: Close\r\n\
         Content-Type: text/plain\r\n\
         Content-Length: {}\r\n\r\n{body}",
        body.len()
    )
    .into_bytes()
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "text/plain",
    }
}
