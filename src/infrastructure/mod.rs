//! Browser-facing adapters: HTTP, console logging, canvas drawing.

pub mod http;
pub mod rendering;
pub mod services;

pub use http::StockApiClient;
