//! Provider types and traits

use std::fmt;
use std::future::Future;

use crate::coord::TileCoord;

/// Errors that can occur while talking to a tile server.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Transport-level failure (connect, TLS, body read)
    HttpError(String),
    /// Request exceeded its timeout
    Timeout(String),
    /// Server answered with something other than 200
    Status { status: u16, url: String },
}

impl ProviderError {
    /// Returns true if the server answered but had no tile.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::Status { status: 404, .. })
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ProviderError::Timeout(url) => write!(f, "Request timed out: {}", url),
            ProviderError::Status { status, url } => {
                write!(f, "HTTP {} from {}", status, url)
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Async access to the tiles of one panorama.
///
/// Implementors know where the tiles live; callers only deal in
/// [`TileCoord`]s.
pub trait AsyncTileProvider: Send + Sync {
    /// Checks whether the tile exists on the server.
    ///
    /// Any failure (timeout, transport error, non-200 status) is reported
    /// as `false`.
    fn exists(&self, coord: &TileCoord) -> impl Future<Output = bool> + Send;

    /// Downloads the encoded bytes of a tile.
    fn download(
        &self,
        coord: &TileCoord,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Returns the panorama id served by this provider.
    fn pano_id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ProviderError::Status {
            status: 404,
            url: "https://x/p/f/0/0_0.jpg".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404 from https://x/p/f/0/0_0.jpg");
        assert!(err.is_not_found());

        let err = ProviderError::Timeout("https://x/".to_string());
        assert!(err.to_string().contains("timed out"));
        assert!(!err.is_not_found());
    }
}
