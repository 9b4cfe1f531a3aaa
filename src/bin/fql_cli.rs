use clap::Parser;
use config::{Config, Environment, File};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde::Deserialize;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// FeatherQL CLI Client
#[derive(Parser, Debug)]
#[command(name = "fql_cli")]
#[command(about = "FeatherQL interactive CLI client", long_about = None)]
struct Args {
    /// Server host
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Server port
    #[arg(short = 'p', long)]
    port: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct ClientConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8080
}

impl ClientConfig {
    /// Load configuration with priority: CLI args > ENV > config file > defaults
    fn load(args: &Args) -> Self {
        let config_paths = ["/etc/featherql/featherql.toml", "./featherql.toml"];

        let mut builder = Config::builder();
        for path in &config_paths {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
                break;
            }
        }
        builder = builder.add_source(Environment::with_prefix("FEATHERQL").separator("_"));

        let base = builder
            .build()
            .ok()
            .and_then(|c| c.try_deserialize::<Self>().ok())
            .unwrap_or_else(|| Self {
                host: default_host(),
                port: default_port(),
            });

        Self {
            host: args.host.clone().unwrap_or(base.host),
            port: args.port.unwrap_or(base.port),
        }
    }
}

/// Percent-encodes a statement for the query string.
fn url_encode(statement: &str) -> String {
    let mut out = String::with_capacity(statement.len());
    for byte in statement.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'*' | b'/' => {
                out.push(byte as char);
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Sends one statement on a fresh connection (the server serves one request
/// per connection) and returns the response body.
async fn send_query(addr: &str, statement: &str) -> Result<String, std::io::Error> {
    let mut stream = TcpStream::connect(addr).await?;
    let request = format!(
        "GET /sql?query={} HTTP/1.1\r\nHost: {addr}\r\nConnection: Close\r\n\r\n",
        url_encode(statement)
    );
    stream.write_all(request.as_bytes()).await?;

    let mut response = String::new();
    stream.read_to_string(&mut response).await?;
    let body = response
        .split_once("\r\n\r\n")
        .map_or(response.as_str(), |(_, body)| body);
    Ok(body.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = ClientConfig::load(&args);
    let addr = format!("{}:{}", config.host, config.port);

    println!("FeatherQL CLI connected target: {addr}");
    println!("Type a statement (select/update/insert/delete/save), 'quit' to quit.\n");

    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("fql> ") {
            Ok(line) => {
                let statement = line.trim();
                if statement.is_empty() {
                    continue;
                }
                if statement.eq_ignore_ascii_case("quit")
                    || statement.eq_ignore_ascii_case("exit")
                {
                    println!("Goodbye!");
                    break;
                }
                let _ = rl.add_history_entry(statement);

                match send_query(&addr, statement).await {
                    Ok(body) => print!("{body}"),
                    Err(e) => eprintln!("✗ Request failed: {e}"),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => {
                eprintln!("✗ Input error: {e}");
                break;
            }
        }
    }

    Ok(())
}
