//! Record source trait

use crate::core::error::FetchError;
use crate::core::record::ListPayload;
use async_trait::async_trait;

/// Asynchronous source of a landing page's records
///
/// Implementations perform one request per call and normalise every failure
/// to a [`FetchError`]. A success without a `results` key is an empty
/// [`ListPayload`], not an error.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the current record set
    async fn fetch(&self) -> Result<ListPayload, FetchError>;

    /// Human-readable location of the source (endpoint URL, "memory")
    fn describe(&self) -> String;
}
