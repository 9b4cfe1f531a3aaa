use super::{http, static_files};
use crate::core::TableRegistry;
use crate::executor::QueryExecutor;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

/// The connection dispatcher: a sequential accept loop that admits at most
/// `max_workers` concurrently active workers and spawns one detached worker
/// per connection. A worker serves exactly one request/response exchange.
pub struct Server {
    registry: Arc<TableRegistry>,
    admission: Arc<Semaphore>,
    doc_root: Arc<str>,
}

impl Server {
    #[must_use]
    pub fn new(max_workers: usize, doc_root: &str) -> Self {
        Self {
            registry: Arc::new(TableRegistry::new()),
            admission: Arc::new(Semaphore::new(max_workers)),
            doc_root: Arc::from(doc_root),
        }
    }

    pub async fn start(&self, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(addr).await?;
        println!(
            "✓ FeatherQL listening on {} ({} worker slot(s))",
            listener.local_addr()?,
            self.admission.available_permits()
        );
        self.serve(listener).await
    }

    /// Runs the accept loop forever. Split from `start` so tests can bind an
    /// ephemeral port themselves.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            let (socket, addr) = listener.accept().await?;
            // Block here until a worker slot frees up; the permit rides along
            // with the worker and is released when it is dropped, on every
            // exit path.
            let permit = Arc::clone(&self.admission).acquire_owned().await?;

            let registry = Arc::clone(&self.registry);
            let doc_root = Arc::clone(&self.doc_root);
            tokio::spawn(async move {
                let _permit = permit;
                if let Err(e) = handle_client(socket, &registry, &doc_root).await {
                    eprintln!("✗ Error handling client {addr}: {e}");
                }
            });
        }
    }
}

/// Serves one request: reads the request line, drains the headers, routes to
/// the query executor or the static-file collaborator, and writes one
/// response.
async fn handle_client(
    mut socket: TcpStream,
    registry: &TableRegistry,
    doc_root: &str,
) -> std::io::Result<()> {
    let (reader, mut writer) = socket.split();
    let mut reader = BufReader::new(reader);

    let mut line = String::new();
    reader.read_line(&mut line).await?;
    let Some(path) = http::request_path(&line).map(str::to_string) else {
        return Ok(());
    };

    let mut header = String::new();
    loop {
        header.clear();
        let n = reader.read_line(&mut header).await?;
        if n == 0 || header == "\r\n" || header == "\n" {
            break;
        }
    }

    let response = if let Some(query) = path.strip_prefix(http::QUERY_PREFIX) {
        let statement = http::url_decode(query);
        let body = QueryExecutor::execute(registry, &statement).await;
        http::text_response(&body).into_bytes()
    } else {
        static_files::response(doc_root, &path).await
    };

    writer.write_all(&response).await?;
    writer.flush().await?;
    Ok(())
}
