use clap::Parser;
use config::{Config, Environment, File};
use featherql::Server;
use serde::Deserialize;
use std::path::Path;

/// FeatherQL server
#[derive(Parser, Debug)]
#[command(name = "featherql")]
#[command(about = "Lightweight in-memory CSV database server", long_about = None)]
struct Args {
    /// Bind host
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Bind port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Maximum number of concurrently active request workers
    #[arg(short = 'w', long)]
    max_workers: Option<usize>,

    /// Root directory for static file requests
    #[arg(short = 'd', long)]
    doc_root: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_max_workers")]
    max_workers: usize,
    #[serde(default = "default_doc_root")]
    doc_root: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_max_workers() -> usize {
    16
}
fn default_doc_root() -> String {
    ".".to_string()
}

impl ServerConfig {
    /// Load configuration with priority: CLI args > ENV > config file > defaults
    fn load(args: &Args) -> Self {
        let config_paths = ["/etc/featherql/featherql.toml", "./featherql.toml"];

        let mut builder = Config::builder();
        for path in &config_paths {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
                eprintln!("Loaded config from: {path}");
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
                max_workers: default_max_workers(),
                doc_root: default_doc_root(),
            });

        Self {
            host: args.host.clone().unwrap_or(base.host),
            port: args.port.unwrap_or(base.port),
            max_workers: args.max_workers.unwrap_or(base.max_workers),
            doc_root: args.doc_root.clone().unwrap_or(base.doc_root),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = ServerConfig::load(&args);

    println!("FeatherQL server starting...");
    println!("  • Host:Port:    {}:{}", config.host, config.port);
    println!("  • Max workers:  {}", config.max_workers);
    println!("  • Doc root:     {}", config.doc_root);

    let server = Server::new(config.max_workers, &config.doc_root);
    server
        .start(&format!("{}:{}", config.host, config.port))
        .await
}
