//! Minimal one-shot HTTP framing: request-line extraction, percent
//! decoding, and the fixed response header every query response is wrapped
//! in. The status line never varies; errors travel in the body text.

/// Path prefix that marks a query request; the rest is the percent-encoded
/// statement.
pub const QUERY_PREFIX: &str = "/sql?query=";

const RESPONSE_HEADER: &str = "HTTP/1.1 200 OK\r\n\
    Server: featherql\r\n\
    Connection: Close\r\n\
    Content-Type: text/plain\r\n\
    Content-Length: ";

/// Wraps body text in the fixed success header with a computed length.
#[must_use]
pub fn text_response(body: &str) -> String {
    format!("{RESPONSE_HEADER}{}\r\n\r\n{body}", body.len())
}

/// Pulls the path out of a `GET /path HTTP/1.1` request line.
#[must_use]
pub fn request_path(line: &str) -> Option<&str> {
    let mut parts = line.split_whitespace();
    let _method = parts.next()?;
    parts.next()
}

/// Decodes `%XX` escapes and `+` as space. Invalid escapes pass through
/// unchanged, so it is always safe to call.
#[must_use]
pub fn url_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                let escape = std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                if let Some(byte) = escape {
                    out.push(byte);
                    i += 3;
                } else {
                    out.push(b'%');
                    i += 1;
                }
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
