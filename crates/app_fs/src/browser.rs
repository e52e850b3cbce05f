//! Remote browser - the listing capability and row helpers

use crate::{Listing, RemotePath, Result, SEPARATOR};
use async_trait::async_trait;

/// Anything that can produce the listing of a remote path
///
/// The controller only ever sees this trait; the HTTP client is one
/// implementation, tests script their own.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch(&self, path: &RemotePath) -> Result<Listing>;
}

/// Display name of a directory entry (its last piece)
/// "/srv/media/music/" -> "music"
pub fn folder_name(directory: &str) -> &str {
    directory
        .trim_end_matches(SEPARATOR)
        .rsplit(SEPARATOR)
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(directory)
}
