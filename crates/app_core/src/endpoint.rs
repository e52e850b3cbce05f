//! Endpoint resolution: media kind + file identity -> fetchable URL
//!
//! Video, audio and PDF go through the backend's media endpoints, which
//! support streaming and range requests. Images are static assets and are
//! fetched from their own location unchanged.

use crate::config::{AppConfig, MediaConfig};
use crate::MediaKind;
use serde::{Deserialize, Serialize};

/// Renderer input: what to show and where to fetch it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMedia {
    pub kind: MediaKind,
    pub source_url: String,
}

/// Resolve with the default `/media/{kind}?filename=` templates
pub fn resolve(kind: MediaKind, file_identity: &str, base: &str) -> Option<String> {
    EndpointResolver::new(base).resolve(kind, file_identity)
}

/// Resolver bound to one backend address and one set of templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResolver {
    base: String,
    templates: MediaConfig,
}

impl EndpointResolver {
    pub fn new(base: &str) -> Self {
        Self::with_templates(base, MediaConfig::default())
    }

    pub fn with_templates(base: &str, templates: MediaConfig) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            templates,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_templates(&config.backend.base_url, config.media.clone())
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// URL for `file_identity`, or `None` for unsupported files
    pub fn resolve(&self, kind: MediaKind, file_identity: &str) -> Option<String> {
        match kind {
            MediaKind::Image => Some(file_identity.to_string()),
            kind if kind.is_streamed() => {
                let template = match kind {
                    MediaKind::Video => &self.templates.video,
                    MediaKind::Audio => &self.templates.audio,
                    _ => &self.templates.pdf,
                };
                Some(format!(
                    "{}{}?{}={}",
                    self.base,
                    template,
                    self.templates.filename_param,
                    urlencoding::encode(file_identity)
                ))
            }
            _ => None,
        }
    }

    pub fn resolve_media(&self, kind: MediaKind, file_identity: &str) -> Option<ResolvedMedia> {
        self.resolve(kind, file_identity).map(|source_url| ResolvedMedia { kind, source_url })
    }
}
