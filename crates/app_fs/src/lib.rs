//! Browsera Remote File Tree Layer
//!
//! Provides a unified interface to the remote browse backend, including:
//! - RemotePath: the browse location as validated path segments
//! - ListingSource: the single "fetch a listing for a path" capability
//! - HttpListingSource: the reqwest-backed implementation of it

mod remote_path;
mod browser;
mod http;

pub use remote_path::{RemotePath, SEPARATOR};
pub use browser::{ListingSource, folder_name};
pub use http::{HttpListingSource, HttpOptions};

pub use browse_proto::{Listing, RemoteFile};

use thiserror::Error;

/// Remote file tree errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    #[error("Invalid path segment: {0:?}")]
    InvalidSegment(String),

    #[error("Depth {depth} out of range for a path of length {len}")]
    IndexOutOfRange { depth: usize, len: usize },

    #[error("{0}")]
    Transport(String),

    #[error("{text}")]
    Status { code: u16, text: String },

    #[error("Malformed listing: {0}")]
    Decode(String),

    #[error("Invalid backend address: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, FsError>;
