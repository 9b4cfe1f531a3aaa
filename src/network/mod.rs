pub mod fetch;
pub mod http;
pub mod server;
pub mod static_files;

pub use server::Server;
