//! Browsera Core Domain Logic
//!
//! This crate contains:
//! - Configuration
//! - Error types
//! - Media classification and endpoint resolution
//! - Browse state, selection and the navigation controller
//! - Command system

pub mod config;
pub mod command;
pub mod error;
pub mod media;
pub mod endpoint;
pub mod selection;
pub mod state;
pub mod navigation;

pub use config::{AppConfig, BackendConfig, GeneralConfig, MediaConfig, BASE_URL_ENV};
pub use command::{Command, CommandId, CommandOutcome, CommandParams};
pub use error::AppError;
pub use media::{classify, MediaKind};
pub use endpoint::{resolve, EndpointResolver, ResolvedMedia};
pub use selection::{download_url, file_identity, preview_file, Preview, Selection};
pub use state::{Breadcrumb, BrowseEntry, BrowsePhase, BrowseState, DisplayCondition, HOME_LABEL};
pub use navigation::{BrowseController, FetchCompletion};

pub use app_fs::{HttpListingSource, ListingSource, RemotePath};
pub use browse_proto::{Listing, RemoteFile};

use std::sync::Arc;

/// Build a controller talking HTTP to the configured backend
pub fn connect(config: &AppConfig) -> Result<BrowseController, AppError> {
    let source = HttpListingSource::new(&config.backend.base_url, &config.http_options())
        .map_err(|e| AppError::Init(e.to_string()))?;
    tracing::info!("Browsing {}", source.browse_url());
    Ok(BrowseController::from_config(Arc::new(source), config))
}
