pub mod analyzer;
pub mod cache;
pub mod server;
pub mod upstream;
mod utils;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;
