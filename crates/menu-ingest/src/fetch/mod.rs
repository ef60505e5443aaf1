//! Retrieval of raw dining hall pages.

pub mod error;
pub mod http;

use async_trait::async_trait;

pub use error::FetchError;
pub use http::HttpFetcher;

/// Retrieves the body of one source page.
///
/// Implementations perform a single attempt; retry policy belongs to the caller.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
