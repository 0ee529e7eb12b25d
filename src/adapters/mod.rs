// Adapters layer: concrete implementations for external systems (http, html listing).

pub mod http;
pub mod wikipedia;

pub use http::HttpFetcher;
pub use wikipedia::WikipediaSource;
