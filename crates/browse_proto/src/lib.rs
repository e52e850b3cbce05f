//! Wire protocol definitions for the Browsera backend
//!
//! This crate defines the JSON shapes exchanged with the browse backend and
//! the endpoint paths the client talks to. It has no transport of its own.

use serde::{Deserialize, Serialize};

/// Default listing endpoint, relative to the backend base address
pub const BROWSE_ENDPOINT: &str = "/browse";

/// Query parameter carrying the wire string of the listed path
pub const BROWSE_PATH_PARAM: &str = "path";

/// Prefix of the streamed media endpoints (`/media/{kind}`)
pub const MEDIA_ENDPOINT: &str = "/media";

/// Query parameter carrying the file identity on media endpoints
pub const MEDIA_FILENAME_PARAM: &str = "filename";

/// One file row of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    /// Display name, extension included
    pub file_name: String,

    /// Location handle the backend understands (absolute path or opaque key)
    pub file_path: String,

    /// Stable identity for list rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Direct link to the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl RemoteFile {
    pub fn new(file_name: &str, file_path: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            file_path: file_path.to_string(),
            key: None,
            url: None,
        }
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    /// Key used to identify the row in a rendered list
    pub fn list_key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.file_path)
    }
}

/// Response body of `GET /browse?path=...`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub files: Vec<RemoteFile>,

    /// Navigable child locations; backends send either bare names or full paths
    #[serde(default)]
    pub directories: Vec<String>,
}

impl Listing {
    /// True when the backend returned neither files nor directories
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }

    /// Find a file row by its location handle or list key
    pub fn find_file(&self, identity: &str) -> Option<&RemoteFile> {
        self.files
            .iter()
            .find(|f| f.file_path == identity)
            .or_else(|| self.files.iter().find(|f| f.list_key() == identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_listing() {
        let body = r#"{
            "files": [
                {"fileName": "clip.mp4", "filePath": "/srv/media/clip.mp4", "key": "k1", "url": "http://cdn/clip.mp4"},
                {"fileName": "notes.pdf", "filePath": "/srv/media/notes.pdf"}
            ],
            "directories": ["/srv/media/music", "/srv/media/photos"]
        }"#;

        let listing: Listing = serde_json::from_str(body).unwrap();
        assert_eq!(listing.files.len(), 2);
        assert_eq!(listing.files[0].key.as_deref(), Some("k1"));
        assert_eq!(listing.files[0].url.as_deref(), Some("http://cdn/clip.mp4"));
        assert_eq!(listing.files[1].key, None);
        assert_eq!(listing.directories, vec!["/srv/media/music", "/srv/media/photos"]);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let listing: Listing = serde_json::from_str(r#"{"files": []}"#).unwrap();
        assert!(listing.is_empty());

        let listing: Listing = serde_json::from_str("{}").unwrap();
        assert!(listing.is_empty());
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let json = serde_json::to_value(RemoteFile::new("a.png", "a.png")).unwrap();
        assert_eq!(json, serde_json::json!({"fileName": "a.png", "filePath": "a.png"}));
    }

    #[test]
    fn test_list_key_falls_back_to_path() {
        let file = RemoteFile::new("a.png", "/x/a.png");
        assert_eq!(file.list_key(), "/x/a.png");
        assert_eq!(file.with_key("abc").list_key(), "abc");
    }

    #[test]
    fn test_find_file_by_path_or_key() {
        let listing = Listing {
            files: vec![
                RemoteFile::new("a.png", "/x/a.png"),
                RemoteFile::new("b.mp3", "/x/b.mp3").with_key("song-b"),
            ],
            directories: Vec::new(),
        };

        assert_eq!(listing.find_file("/x/a.png").map(|f| f.file_name.as_str()), Some("a.png"));
        assert_eq!(listing.find_file("song-b").map(|f| f.file_name.as_str()), Some("b.mp3"));
        assert!(listing.find_file("/x/c.wav").is_none());
    }
}
