//! The file currently opened for preview

use crate::{classify, EndpointResolver, MediaKind, ResolvedMedia};
use browse_proto::RemoteFile;

/// What the view should render for an opened file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Hand `source_url` to the renderer for `kind`
    Media(ResolvedMedia),
    /// No renderer; show a fallback notice instead
    Unsupported { file_name: String },
}

/// At most one opened file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    file: Option<RemoteFile>,
}

impl Selection {
    pub fn open(&mut self, file: RemoteFile) {
        self.file = Some(file);
    }

    pub fn close(&mut self) -> Option<RemoteFile> {
        self.file.take()
    }

    pub fn current(&self) -> Option<&RemoteFile> {
        self.file.as_ref()
    }
}

/// The identity handed to the resolver for `file`
///
/// Images are fetched directly, so their direct link wins when the backend
/// sent one. Streamed kinds always go by the backend location handle.
pub fn file_identity(file: &RemoteFile, kind: MediaKind) -> &str {
    match kind {
        MediaKind::Image => file.url.as_deref().unwrap_or(&file.file_path),
        _ => &file.file_path,
    }
}

/// Classify and resolve `file` into renderer input
pub fn preview_file(file: &RemoteFile, resolver: &EndpointResolver) -> Preview {
    let kind = classify(&file.file_name);
    match resolver.resolve_media(kind, file_identity(file, kind)) {
        Some(media) => Preview::Media(media),
        None => Preview::Unsupported {
            file_name: file.file_name.clone(),
        },
    }
}

/// Link for downloading `file`: its direct link, else the resolved endpoint
pub fn download_url(file: &RemoteFile, resolver: &EndpointResolver) -> Option<String> {
    file.url.clone().or_else(|| {
        let kind = classify(&file.file_name);
        resolver.resolve(kind, file_identity(file, kind))
    })
}
