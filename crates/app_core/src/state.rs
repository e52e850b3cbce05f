//! Browse state owned by the controller, and the views derived from it

use crate::{Command, CommandId, Selection};
use app_fs::{folder_name, RemotePath};
use browse_proto::{Listing, RemoteFile};

/// Where the current navigation stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowsePhase {
    /// Nothing requested yet
    Idle,
    /// A fetch for the current path is outstanding
    Loading,
    /// The listing of the current path arrived
    Settled(Listing),
    /// The fetch for the current path failed with this message
    Failed(String),
}

/// Main browse state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseState {
    path: RemotePath,
    phase: BrowsePhase,
    selection: Selection,
}

/// What the view should show right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCondition<'a> {
    Idle,
    Loading,
    Failed(&'a str),
    /// Settled, but the backend returned no files and no directories
    Empty,
    Entries(Vec<BrowseEntry<'a>>),
}

/// One render-ready row: files first, then directories, each in received order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseEntry<'a> {
    File(&'a RemoteFile),
    Directory {
        /// Display name (last piece of the entry)
        name: &'a str,
        /// The entry exactly as the backend sent it
        raw: &'a str,
        /// Normalized navigation target
        path: RemotePath,
    },
}

impl BrowseEntry<'_> {
    pub fn name(&self) -> &str {
        match self {
            BrowseEntry::File(file) => &file.file_name,
            BrowseEntry::Directory { name, .. } => name,
        }
    }
}

/// A clickable breadcrumb; `depth` is the ancestor depth it leads to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    pub depth: usize,
}

pub const HOME_LABEL: &str = "Home";

impl Breadcrumb {
    /// Segment index for `nav.breadcrumb`; `None` for Home
    pub fn index(&self) -> Option<usize> {
        self.depth.checked_sub(1)
    }

    /// The command a click on this crumb issues
    pub fn command(&self) -> Command {
        match self.index() {
            Some(index) => Command::new(CommandId::NAV_BREADCRUMB).with_int(index as i64),
            None => Command::new(CommandId::NAV_HOME),
        }
    }
}

impl BrowseState {
    pub fn new() -> Self {
        Self {
            path: RemotePath::root(),
            phase: BrowsePhase::Idle,
            selection: Selection::default(),
        }
    }

    pub fn path(&self) -> &RemotePath {
        &self.path
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn listing(&self) -> Option<&Listing> {
        match &self.phase {
            BrowsePhase::Settled(listing) => Some(listing),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == BrowsePhase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            BrowsePhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub(crate) fn begin_loading(&mut self, path: RemotePath) {
        self.path = path;
        self.phase = BrowsePhase::Loading;
        // The opened file belonged to the listing being replaced
        self.selection.close();
    }

    pub(crate) fn settle(&mut self, listing: Listing) {
        self.phase = BrowsePhase::Settled(listing);
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.phase = BrowsePhase::Failed(message);
    }

    pub(crate) fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// The single condition the view renders
    pub fn display(&self) -> DisplayCondition<'_> {
        match &self.phase {
            BrowsePhase::Idle => DisplayCondition::Idle,
            BrowsePhase::Loading => DisplayCondition::Loading,
            BrowsePhase::Failed(message) => DisplayCondition::Failed(message),
            BrowsePhase::Settled(listing) if listing.is_empty() => DisplayCondition::Empty,
            BrowsePhase::Settled(_) => DisplayCondition::Entries(self.entries()),
        }
    }

    /// Merged rows of the settled listing, empty otherwise
    pub fn entries(&self) -> Vec<BrowseEntry<'_>> {
        let Some(listing) = self.listing() else {
            return Vec::new();
        };

        let files = listing.files.iter().map(BrowseEntry::File);
        let directories = listing.directories.iter().filter_map(|raw| {
            match self.path.resolve_directory(raw) {
                Ok(path) => Some(BrowseEntry::Directory {
                    name: folder_name(raw),
                    raw: raw.as_str(),
                    path,
                }),
                Err(e) => {
                    tracing::warn!("Skipping directory entry {:?}: {}", raw, e);
                    None
                }
            }
        });

        files.chain(directories).collect()
    }

    /// Breadcrumb trail; empty at the root so the view can hide it
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        if self.path.is_root() {
            return Vec::new();
        }

        std::iter::once(Breadcrumb {
            label: HOME_LABEL.to_string(),
            depth: 0,
        })
        .chain(
            self.path
                .display_segments()
                .iter()
                .enumerate()
                .map(|(index, segment)| Breadcrumb {
                    label: segment.clone(),
                    depth: index + 1,
                }),
        )
        .collect()
    }
}

impl Default for BrowseState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled(path: &str, listing: Listing) -> BrowseState {
        let mut state = BrowseState::new();
        state.begin_loading(RemotePath::parse(path));
        state.settle(listing);
        state
    }

    #[test]
    fn test_new_state_is_idle_at_root() {
        let state = BrowseState::new();
        assert!(state.path().is_root());
        assert_eq!(state.display(), DisplayCondition::Idle);
    }

    #[test]
    fn test_exactly_one_condition_at_a_time() {
        let mut state = BrowseState::new();
        state.begin_loading(RemotePath::root());
        assert!(state.is_loading() && state.error().is_none() && state.listing().is_none());

        state.fail("Not Found".into());
        assert!(!state.is_loading() && state.error() == Some("Not Found") && state.listing().is_none());
        assert_eq!(state.display(), DisplayCondition::Failed("Not Found"));

        state.begin_loading(RemotePath::root());
        state.settle(Listing::default());
        assert!(!state.is_loading() && state.error().is_none() && state.listing().is_some());
    }

    #[test]
    fn test_empty_listing_is_its_own_condition() {
        let state = settled("", Listing::default());
        assert_eq!(state.display(), DisplayCondition::Empty);
        assert_ne!(state.display(), DisplayCondition::Loading);
    }

    #[test]
    fn test_entries_put_files_first_in_received_order() {
        let listing = Listing {
            files: vec![RemoteFile::new("z.mp4", "/m/z.mp4"), RemoteFile::new("a.pdf", "/m/a.pdf")],
            directories: vec!["/m/photos".into(), "music".into()],
        };
        let state = settled("m", listing);

        let names: Vec<_> = state.entries().iter().map(|e| e.name().to_string()).collect();
        assert_eq!(names, vec!["z.mp4", "a.pdf", "photos", "music"]);

        match &state.entries()[3] {
            BrowseEntry::Directory { raw, path, .. } => {
                assert_eq!(*raw, "music");
                assert_eq!(path.to_wire_string(), "m/music");
            }
            other => panic!("expected directory, got {:?}", other),
        }
    }

    #[test]
    fn test_unusable_directory_entries_are_skipped() {
        let listing = Listing {
            files: Vec::new(),
            directories: vec!["".into(), "/".into(), "ok".into()],
        };
        let state = settled("", listing);
        let entries = state.entries();
        assert_eq!(entries.len(), 1);
        assert!(matches!(entries[0], BrowseEntry::Directory { name: "ok", .. }));
    }

    #[test]
    fn test_breadcrumbs() {
        assert!(settled("", Listing::default()).breadcrumbs().is_empty());

        let crumbs = settled("a/b", Listing::default()).breadcrumbs();
        assert_eq!(
            crumbs,
            vec![
                Breadcrumb { label: "Home".into(), depth: 0 },
                Breadcrumb { label: "a".into(), depth: 1 },
                Breadcrumb { label: "b".into(), depth: 2 },
            ]
        );

        assert_eq!(crumbs[0].index(), None);
        assert_eq!(crumbs[0].command().id.as_str(), CommandId::NAV_HOME);
        assert_eq!(crumbs[2].index(), Some(1));
        let click = crumbs[2].command();
        assert_eq!(click.id.as_str(), CommandId::NAV_BREADCRUMB);
        assert_eq!(click.params.int_value, Some(1));
    }

    #[test]
    fn test_loading_clears_selection() {
        let mut state = settled("", Listing::default());
        state.selection_mut().open(RemoteFile::new("a.mp4", "a.mp4"));
        state.begin_loading(RemotePath::parse("x"));
        assert!(state.selection().current().is_none());
    }
}
