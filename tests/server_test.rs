// End-to-end dispatcher tests: one request per connection, fixed response
// framing, error bodies, static files, and the admission bound.

use featherql::Server;
use std::io::Write;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout};

async fn start_server(max_workers: usize, doc_root: &str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = Server::new(max_workers, doc_root);
    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });
    addr
}

/// Spaces become `+`; everything else in our statements is legal in a
/// request line as-is.
fn encode(statement: &str) -> String {
    statement.replace('%', "%25").replace('+', "%2B").replace(' ', "+")
}

async fn send(addr: SocketAddr, target: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(format!("GET {target} HTTP/1.1\r\nHost: test\r\n\r\n").as_bytes())
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

async fn query(addr: SocketAddr, statement: &str) -> String {
    send(addr, &format!("/sql?query={}", encode(statement))).await
}

fn scores_csv(dir: &tempfile::TempDir) -> String {
    let path = dir.path().join("scores.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "id,name,score\n1,Amy,10\n2,Bo,20\n").unwrap();
    path.to_str().unwrap().to_string()
}

fn body_of(response: &str) -> &str {
    response.split_once("\r\n\r\n").map(|(_, b)| b).unwrap_or(response)
}

#[tokio::test]
async fn query_response_is_framed_with_content_length() {
    let dir = tempfile::tempdir().unwrap();
    let csv = scores_csv(&dir);
    let addr = start_server(4, dir.path().to_str().unwrap()).await;

    let response = query(addr, &format!("select * from {csv}")).await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));

    let body = body_of(&response);
    assert_eq!(
        body,
        "id\tname\tscore\n1\tAmy\t10\n2\tBo\t20\n2 row(s) selected.\n"
    );
    assert!(response.contains(&format!("Content-Length: {}\r\n", body.len())));
}

#[tokio::test]
async fn failures_are_error_bodies_under_200() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(4, dir.path().to_str().unwrap()).await;

    // No table selected yet on a fresh server.
    let response = query(addr, "select *").await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(body_of(&response), "Error: No table has been selected yet\n");

    let response = query(addr, "this is not a statement").await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(body_of(&response).starts_with("Error: Parse error:"));
}

#[tokio::test]
async fn mutations_work_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let csv = scores_csv(&dir);
    let addr = start_server(4, dir.path().to_str().unwrap()).await;

    let response = query(addr, &format!("update {csv} set score=30 where id=1")).await;
    assert_eq!(body_of(&response), "1 row(s) updated.\n");

    // Empty identifier on the next connection reuses the recent table.
    let response = query(addr, "select * where id=1").await;
    assert_eq!(
        body_of(&response),
        "id\tname\tscore\n1\tAmy\t30\n1 row(s) selected.\n"
    );

    let response = query(addr, "save").await;
    assert_eq!(body_of(&response), format!("{csv} saved.\n"));
    let written = std::fs::read_to_string(&csv).unwrap();
    assert_eq!(written, "id,name,score\n1,Amy,30\n2,Bo,20\n");
}

#[tokio::test]
async fn non_query_paths_go_to_static_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<p>hello</p>").unwrap();
    let addr = start_server(4, dir.path().to_str().unwrap()).await;

    let response = send(addr, "/index.html").await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.ends_with("<p>hello</p>"));

    let response = send(addr, "/missing.html").await;
    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
}

#[tokio::test]
async fn blocked_worker_is_woken_by_another_connection() {
    let dir = tempfile::tempdir().unwrap();
    let csv = scores_csv(&dir);
    let addr = start_server(2, dir.path().to_str().unwrap()).await;

    // Warm the registry so the waiter can use the recent table.
    query(addr, &format!("select * from {csv}")).await;

    let waiter = tokio::spawn(async move {
        query(addr, "select name where score=99 wait").await
    });
    sleep(Duration::from_millis(200)).await;
    assert!(!waiter.is_finished());

    let response = query(addr, "update set score=99 where id=2").await;
    assert_eq!(body_of(&response), "1 row(s) updated.\n");

    let response = timeout(Duration::from_secs(5), waiter).await.unwrap().unwrap();
    assert_eq!(body_of(&response), "name\nBo\n1 row(s) selected.\n");
}

#[tokio::test]
async fn admission_bound_holds_back_excess_workers() {
    let dir = tempfile::tempdir().unwrap();
    let csv = scores_csv(&dir);
    let addr = start_server(1, dir.path().to_str().unwrap()).await;

    query(addr, &format!("select * from {csv}")).await;

    // Occupy the only worker slot with a never-matching wait.
    let mut blocked = TcpStream::connect(addr).await.unwrap();
    blocked
        .write_all(
            format!(
                "GET /sql?query={} HTTP/1.1\r\nHost: test\r\n\r\n",
                encode("select * where score=999 wait")
            )
            .as_bytes(),
        )
        .await
        .unwrap();
    sleep(Duration::from_millis(200)).await;

    // The next connection is accepted but its worker must not start until a
    // slot frees up, so no response arrives.
    let mut held = TcpStream::connect(addr).await.unwrap();
    held.write_all(b"GET /sql?query=select+* HTTP/1.1\r\nHost: test\r\n\r\n")
        .await
        .unwrap();
    let mut buf = [0u8; 64];
    let read = timeout(Duration::from_millis(500), held.read(&mut buf)).await;
    assert!(read.is_err(), "second worker ran despite max_workers = 1");
}

#[tokio::test]
async fn slot_release_admits_the_next_connection() {
    let dir = tempfile::tempdir().unwrap();
    let csv = scores_csv(&dir);
    let addr = start_server(1, dir.path().to_str().unwrap()).await;

    // Sequential requests through a single slot all succeed.
    for _ in 0..3 {
        let response = query(addr, &format!("select name from {csv} where id=1")).await;
        assert_eq!(body_of(&response), "name\nAmy\n1 row(s) selected.\n");
    }
}
