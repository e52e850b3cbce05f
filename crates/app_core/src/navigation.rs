//! Browse navigation: path transitions, listing fetches and history
//!
//! The controller owns the [`BrowseState`]. Every navigation bumps a
//! generation counter, cancels the previous fetch and spawns a new one; the
//! completion comes back through a channel and is applied only if it still
//! matches the latest navigation.

use crate::command::{Command, CommandId, CommandOutcome};
use crate::selection::preview_file;
use crate::{AppConfig, AppError, BrowseState, EndpointResolver, Preview};
use app_fs::{ListingSource, RemotePath};
use browse_proto::Listing;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Outcome of one listing fetch, tagged with the navigation that issued it
#[derive(Debug)]
pub struct FetchCompletion {
    generation: u64,
    path: RemotePath,
    result: Result<Listing, AppError>,
}

/// Navigation state machine over a remote listing source
pub struct BrowseController {
    source: Arc<dyn ListingSource>,
    resolver: EndpointResolver,
    timeout: Duration,

    state: BrowseState,

    /// Bumped on every navigation; completions carry the value they were issued with
    generation: u64,
    in_flight: Option<CancellationToken>,

    /// Navigation history stack
    history: Vec<RemotePath>,
    /// Forward stack (for redo)
    forward: Vec<RemotePath>,

    completion_tx: mpsc::UnboundedSender<FetchCompletion>,
    completion_rx: mpsc::UnboundedReceiver<FetchCompletion>,
}

impl BrowseController {
    /// Create an idle controller; call [`start`](Self::start) to load the root
    pub fn new(source: Arc<dyn ListingSource>, resolver: EndpointResolver, timeout: Duration) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        Self {
            source,
            resolver,
            timeout,
            state: BrowseState::new(),
            generation: 0,
            in_flight: None,
            history: Vec::new(),
            forward: Vec::new(),
            completion_tx,
            completion_rx,
        }
    }

    pub fn from_config(source: Arc<dyn ListingSource>, config: &AppConfig) -> Self {
        Self::new(source, EndpointResolver::from_config(config), config.request_timeout())
    }

    /// Issue the initial root fetch
    pub fn start(&mut self) {
        tracing::info!("Browse session started against {}", self.resolver.base());
        self.load(RemotePath::root());
    }

    pub fn state(&self) -> &BrowseState {
        &self.state
    }

    pub fn resolver(&self) -> &EndpointResolver {
        &self.resolver
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }

    // ========================================
    // Navigation
    // ========================================

    /// Navigate to a new path
    pub fn navigate(&mut self, path: RemotePath) {
        let previous = self.state.path().clone();
        if previous != path {
            // Save current to history
            self.history.push(previous);
            // Clear forward stack
            self.forward.clear();
        }
        self.load(path);
    }

    /// Jump to the root (Home)
    pub fn home(&mut self) {
        self.navigate(RemotePath::root());
    }

    /// Jump to the ancestor of the current path with `depth` segments
    pub fn jump_to_depth(&mut self, depth: usize) -> Result<(), AppError> {
        let target = self.state.path().ancestor(depth)?;
        self.navigate(target);
        Ok(())
    }

    /// Click on the breadcrumb of the segment at `index`
    /// `[a, b, c]`, index 1 -> `[a, b]`
    pub fn open_breadcrumb(&mut self, index: usize) -> Result<(), AppError> {
        self.jump_to_depth(index + 1)
    }

    /// Go to the parent folder; false at the root
    pub fn up(&mut self) -> bool {
        match self.state.path().parent() {
            Some(parent) => {
                self.navigate(parent);
                true
            }
            None => false,
        }
    }

    /// Enter a directory row as the listing reported it (full path or bare name)
    pub fn enter_directory(&mut self, entry: &str) -> Result<(), AppError> {
        let target = self.state.path().resolve_directory(entry)?;
        self.navigate(target);
        Ok(())
    }

    /// Go back in history
    pub fn back(&mut self) -> bool {
        if let Some(prev) = self.history.pop() {
            self.forward.push(self.state.path().clone());
            self.load(prev);
            true
        } else {
            false
        }
    }

    /// Go forward in history
    pub fn go_forward(&mut self) -> bool {
        if let Some(next) = self.forward.pop() {
            self.history.push(self.state.path().clone());
            self.load(next);
            true
        } else {
            false
        }
    }

    /// Fetch the current path again
    pub fn reload(&mut self) {
        let path = self.state.path().clone();
        self.load(path);
    }

    /// Enter `Loading(path)` and spawn the fetch for it
    fn load(&mut self, path: RemotePath) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }

        self.generation += 1;
        let generation = self.generation;
        self.state.begin_loading(path.clone());

        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());

        let source = Arc::clone(&self.source);
        let tx = self.completion_tx.clone();
        let timeout = self.timeout;

        tracing::debug!(generation, path = %path, "Fetching listing");

        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::debug!(generation, "Fetch abandoned");
                    return;
                }
                fetched = tokio::time::timeout(timeout, source.fetch(&path)) => match fetched {
                    Ok(Ok(listing)) => Ok(listing),
                    Ok(Err(e)) => Err(AppError::from(e)),
                    Err(_) => Err(AppError::Timeout(timeout.as_millis() as u64)),
                },
            };

            // The receiver lives as long as the controller
            let _ = tx.send(FetchCompletion {
                generation,
                path,
                result,
            });
        });
    }

    // ========================================
    // Completions
    // ========================================

    /// Apply a completion; stale ones are discarded and return false
    pub fn apply(&mut self, completion: FetchCompletion) -> bool {
        if completion.generation != self.generation || &completion.path != self.state.path() {
            tracing::debug!(
                "Discarding stale listing for {} (generation {}, current {})",
                completion.path,
                completion.generation,
                self.generation
            );
            return false;
        }

        if !self.state.is_loading() {
            return false;
        }

        self.in_flight = None;

        match completion.result {
            Ok(listing) => {
                tracing::info!(
                    path = %completion.path,
                    files = listing.files.len(),
                    directories = listing.directories.len(),
                    "Listing settled"
                );
                self.state.settle(listing);
            }
            Err(e) => {
                tracing::warn!("Listing for {} failed: {}", completion.path, e);
                self.state.fail(e.user_message());
            }
        }

        true
    }

    /// Wait for the next completion (stale or not) without applying it
    pub async fn next_completion(&mut self) -> Option<FetchCompletion> {
        self.completion_rx.recv().await
    }

    /// Apply every completion that has already arrived; returns how many took effect
    pub fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completion_rx.try_recv() {
            if self.apply(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait until the current navigation settles or fails
    pub async fn settle(&mut self) {
        while self.state.is_loading() {
            match self.completion_rx.recv().await {
                Some(completion) => {
                    self.apply(completion);
                }
                None => break,
            }
        }
    }

    // ========================================
    // Selection
    // ========================================

    /// Open a file of the settled listing by location handle or list key
    pub fn open_file(&mut self, identity: &str) -> Result<Preview, AppError> {
        let listing = self.state.listing().ok_or(AppError::NotSettled)?;
        let file = listing
            .find_file(identity)
            .cloned()
            .ok_or_else(|| AppError::FileNotInListing(identity.to_string()))?;

        let preview = preview_file(&file, &self.resolver);
        tracing::info!("Opened {} as {:?}", file.file_name, preview);

        self.state.selection_mut().open(file);
        Ok(preview)
    }

    /// Close the opened file; false if none was open
    pub fn close_file(&mut self) -> bool {
        self.state.selection_mut().close().is_some()
    }

    /// Renderer input for the opened file
    pub fn preview(&self) -> Option<Preview> {
        self.state
            .selection()
            .current()
            .map(|file| preview_file(file, &self.resolver))
    }

    // ========================================
    // Commands
    // ========================================

    /// Execute a view command
    pub fn execute(&mut self, cmd: &Command) -> Result<CommandOutcome, AppError> {
        tracing::debug!("Executing {}", cmd.id.as_str());

        let navigated = |moved: bool| {
            if moved {
                CommandOutcome::Navigated
            } else {
                CommandOutcome::Unchanged
            }
        };

        match cmd.id.as_str() {
            CommandId::NAV_HOME => {
                self.home();
                Ok(CommandOutcome::Navigated)
            }
            CommandId::NAV_BREADCRUMB => {
                let index = cmd
                    .params
                    .int_value
                    .and_then(|v| usize::try_from(v).ok())
                    .ok_or_else(|| missing(cmd, "index"))?;
                self.open_breadcrumb(index)?;
                Ok(CommandOutcome::Navigated)
            }
            CommandId::NAV_UP_FOLDER => Ok(navigated(self.up())),
            CommandId::NAV_ENTER_FOLDER => {
                let entry = cmd.params.path_value.as_deref().ok_or_else(|| missing(cmd, "directory"))?;
                self.enter_directory(entry)?;
                Ok(CommandOutcome::Navigated)
            }
            CommandId::NAV_BACK => Ok(navigated(self.back())),
            CommandId::NAV_FORWARD => Ok(navigated(self.go_forward())),
            CommandId::NAV_RELOAD => {
                self.reload();
                Ok(CommandOutcome::Navigated)
            }
            CommandId::FILE_OPEN => {
                let identity = cmd.params.path_value.as_deref().ok_or_else(|| missing(cmd, "file"))?;
                self.open_file(identity).map(CommandOutcome::Opened)
            }
            CommandId::FILE_CLOSE => Ok(if self.close_file() {
                CommandOutcome::Closed
            } else {
                CommandOutcome::Unchanged
            }),
            CommandId::APP_QUIT => Ok(CommandOutcome::Quit),
            other => {
                tracing::warn!("Unknown command: {}", other);
                Err(AppError::UnknownCommand(other.to_string()))
            }
        }
    }
}

fn missing(cmd: &Command, parameter: &str) -> AppError {
    AppError::MissingParameter {
        command: cmd.id.as_str().to_string(),
        parameter: parameter.to_string(),
    }
}

impl Drop for BrowseController {
    fn drop(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DisplayCondition, MediaKind, ResolvedMedia};
    use app_fs::FsError;
    use async_trait::async_trait;
    use browse_proto::RemoteFile;
    use std::collections::HashMap;
    use std::sync::Mutex;

    type Script = (Duration, Result<Listing, FsError>);

    /// In-memory listing source with per-path latency and results
    #[derive(Default)]
    struct ScriptedSource {
        scripts: HashMap<String, Script>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        fn with(mut self, wire: &str, delay_ms: u64, result: Result<Listing, FsError>) -> Self {
            self.scripts.insert(wire.to_string(), (Duration::from_millis(delay_ms), result));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ListingSource for ScriptedSource {
        async fn fetch(&self, path: &RemotePath) -> app_fs::Result<Listing> {
            let wire = path.to_wire_string();
            self.calls.lock().unwrap().push(wire.clone());

            let (delay, result) = self
                .scripts
                .get(&wire)
                .cloned()
                .unwrap_or((Duration::ZERO, Ok(Listing::default())));

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            result
        }
    }

    fn listing(files: &[(&str, &str)], directories: &[&str]) -> Listing {
        Listing {
            files: files.iter().map(|(name, path)| RemoteFile::new(name, path)).collect(),
            directories: directories.iter().map(|d| d.to_string()).collect(),
        }
    }

    fn controller(source: ScriptedSource) -> (BrowseController, Arc<ScriptedSource>) {
        let source = Arc::new(source);
        let controller = BrowseController::new(
            source.clone(),
            EndpointResolver::new("http://h:8080"),
            Duration::from_secs(5),
        );
        (controller, source)
    }

    fn path(wire: &str) -> RemotePath {
        RemotePath::parse(wire)
    }

    #[tokio::test]
    async fn test_start_loads_root() {
        let (mut ctl, source) = controller(
            ScriptedSource::default().with("", 0, Ok(listing(&[("a.mp4", "/a.mp4")], &["/music"]))),
        );
        assert_eq!(ctl.state().display(), DisplayCondition::Idle);

        ctl.start();
        assert!(ctl.state().is_loading());
        assert!(ctl.state().path().is_root());

        ctl.settle().await;
        assert_eq!(ctl.state().entries().len(), 2);
        assert_eq!(source.calls(), vec![""]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_result_of_superseded_navigation_never_shows() {
        let (mut ctl, _source) = controller(
            ScriptedSource::default()
                .with("a", 100, Ok(listing(&[("from-a.mp4", "a/from-a.mp4")], &[])))
                .with("b", 10, Ok(listing(&[("from-b.mp4", "b/from-b.mp4")], &[]))),
        );

        ctl.navigate(path("a"));
        ctl.navigate(path("b"));
        ctl.settle().await;

        // Let A's latency elapse, then pick up anything that arrived
        tokio::time::sleep(Duration::from_millis(500)).await;
        ctl.drain_completions();

        assert_eq!(ctl.state().path(), &path("b"));
        let names: Vec<_> = ctl.state().entries().iter().map(|e| e.name().to_string()).collect();
        assert_eq!(names, vec!["from-b.mp4"]);
    }

    #[tokio::test]
    async fn test_stale_completion_is_discarded() {
        let (mut ctl, _source) = controller(ScriptedSource::default());

        ctl.navigate(path("a"));
        let stale_generation = ctl.generation;
        ctl.navigate(path("b"));

        let stale = FetchCompletion {
            generation: stale_generation,
            path: path("a"),
            result: Ok(listing(&[("from-a.mp4", "a/from-a.mp4")], &[])),
        };
        assert!(!ctl.apply(stale));
        assert!(ctl.state().is_loading());
        assert_eq!(ctl.state().path(), &path("b"));

        ctl.settle().await;
        assert_eq!(ctl.state().display(), DisplayCondition::Empty);
    }

    #[tokio::test]
    async fn test_reload_discards_same_path_from_older_generation() {
        let (mut ctl, _source) = controller(ScriptedSource::default());

        ctl.navigate(path("a"));
        let first = ctl.generation;
        ctl.reload();

        let stale = FetchCompletion {
            generation: first,
            path: path("a"),
            result: Err(AppError::Transport("boom".into())),
        };
        assert!(!ctl.apply(stale));
        assert!(ctl.state().is_loading());
    }

    #[tokio::test]
    async fn test_failure_then_recovery() {
        let (mut ctl, _source) = controller(
            ScriptedSource::default()
                .with("missing", 0, Err(FsError::Status { code: 404, text: "Not Found".into() }))
                .with("ok", 0, Ok(listing(&[], &["ok/sub"]))),
        );

        ctl.navigate(path("missing"));
        ctl.settle().await;
        assert_eq!(ctl.state().error(), Some("Not Found"));
        assert_eq!(ctl.state().display(), DisplayCondition::Failed("Not Found"));

        ctl.navigate(path("ok"));
        assert!(ctl.state().error().is_none());
        assert!(ctl.state().is_loading());

        ctl.settle().await;
        assert!(ctl.state().listing().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_backend_times_out() {
        let source = Arc::new(ScriptedSource::default().with("slow", 60_000, Ok(Listing::default())));
        let mut ctl = BrowseController::new(
            source,
            EndpointResolver::new("http://h:8080"),
            Duration::from_secs(1),
        );

        ctl.navigate(path("slow"));
        ctl.settle().await;

        assert_eq!(ctl.state().error(), Some(AppError::Timeout(1000).user_message().as_str()));
    }

    #[tokio::test]
    async fn test_open_file_only_when_settled() {
        let (mut ctl, _source) = controller(
            ScriptedSource::default().with("", 0, Ok(listing(&[("clip.mp4", "clip.mp4"), ("notes.txt", "notes.txt")], &[]))),
        );

        ctl.start();
        assert_eq!(ctl.open_file("clip.mp4"), Err(AppError::NotSettled));

        ctl.settle().await;
        let before = ctl.state().listing().cloned();

        let preview = ctl.open_file("clip.mp4").unwrap();
        assert_eq!(
            preview,
            Preview::Media(ResolvedMedia {
                kind: MediaKind::Video,
                source_url: "http://h:8080/media/video?filename=clip.mp4".into(),
            })
        );
        assert_eq!(ctl.preview(), Some(preview));
        assert!(ctl.state().path().is_root());
        assert_eq!(ctl.state().listing().cloned(), before);

        assert_eq!(
            ctl.open_file("notes.txt").unwrap(),
            Preview::Unsupported { file_name: "notes.txt".into() }
        );
        assert!(matches!(ctl.open_file("nope.mp4"), Err(AppError::FileNotInListing(_))));

        assert!(ctl.close_file());
        assert!(!ctl.close_file());
        assert_eq!(ctl.preview(), None);
    }

    #[tokio::test]
    async fn test_navigate_closes_opened_file() {
        let (mut ctl, _source) = controller(
            ScriptedSource::default().with("", 0, Ok(listing(&[("a.png", "http://x/a.png")], &["sub"]))),
        );
        ctl.start();
        ctl.settle().await;
        ctl.open_file("http://x/a.png").unwrap();

        ctl.enter_directory("sub").unwrap();
        assert!(ctl.state().selection().current().is_none());
    }

    #[tokio::test]
    async fn test_breadcrumbs_and_home() {
        let (mut ctl, _source) = controller(ScriptedSource::default());

        ctl.navigate(path("a/b/c"));
        ctl.open_breadcrumb(1).unwrap();
        assert_eq!(ctl.state().path(), &path("a/b"));

        ctl.jump_to_depth(0).unwrap();
        assert!(ctl.state().path().is_root());
        assert!(ctl.state().breadcrumbs().is_empty());

        ctl.navigate(path("a/b/c"));
        let err = ctl.open_breadcrumb(3).unwrap_err();
        assert_eq!(err, AppError::IndexOutOfRange { depth: 4, len: 3 });
        assert!(err.is_fatal());
        assert_eq!(ctl.state().path(), &path("a/b/c"));

        ctl.home();
        assert!(ctl.state().path().is_root());
    }

    #[tokio::test]
    async fn test_breadcrumb_command_takes_segment_index() {
        let (mut ctl, _source) = controller(ScriptedSource::default());

        ctl.navigate(path("a/b/c"));
        assert_eq!(
            ctl.execute(&Command::new(CommandId::NAV_BREADCRUMB).with_int(1)).unwrap(),
            CommandOutcome::Navigated
        );
        assert_eq!(ctl.state().path(), &path("a/b"));

        ctl.execute(&Command::new(CommandId::NAV_BREADCRUMB).with_int(0)).unwrap();
        assert_eq!(ctl.state().path(), &path("a"));

        assert!(matches!(
            ctl.execute(&Command::new(CommandId::NAV_BREADCRUMB).with_int(-1)),
            Err(AppError::MissingParameter { .. })
        ));
    }

    #[tokio::test]
    async fn test_enter_directory_normalizes_entries() {
        let (mut ctl, source) = controller(ScriptedSource::default());

        ctl.navigate(path("/srv/media"));
        ctl.enter_directory("/srv/media/music").unwrap();
        assert_eq!(ctl.state().path(), &path("/srv/media/music"));

        ctl.enter_directory("jazz").unwrap();
        assert_eq!(ctl.state().path(), &path("/srv/media/music/jazz"));

        assert!(ctl.enter_directory("").unwrap_err().is_fatal());
        assert!(ctl.enter_directory("..").unwrap_err().is_fatal());

        ctl.settle().await;
        assert_eq!(source.calls().last().map(String::as_str), Some("/srv/media/music/jazz"));
    }

    #[tokio::test]
    async fn test_history() {
        let (mut ctl, _source) = controller(ScriptedSource::default());
        ctl.start();

        ctl.navigate(path("a"));
        ctl.navigate(path("a/b"));
        assert!(ctl.back());
        assert_eq!(ctl.state().path(), &path("a"));
        assert!(ctl.back());
        assert!(ctl.state().path().is_root());
        assert!(!ctl.back());

        assert!(ctl.go_forward());
        assert_eq!(ctl.state().path(), &path("a"));

        // A fresh navigation drops the forward branch
        ctl.navigate(path("x"));
        assert!(!ctl.can_go_forward());

        assert!(ctl.up());
        assert!(ctl.state().path().is_root());
        assert!(!ctl.up());
    }

    #[tokio::test]
    async fn test_execute_commands() {
        let (mut ctl, _source) = controller(
            ScriptedSource::default().with("", 0, Ok(listing(&[("doc.pdf", "/d/doc.pdf")], &["/d"]))),
        );
        ctl.start();
        ctl.settle().await;

        let opened = ctl.execute(&Command::new(CommandId::FILE_OPEN).with_path("/d/doc.pdf")).unwrap();
        assert!(matches!(opened, CommandOutcome::Opened(Preview::Media(ref m)) if m.kind == MediaKind::Pdf));
        assert_eq!(ctl.execute(&Command::new(CommandId::FILE_CLOSE)).unwrap(), CommandOutcome::Closed);

        assert_eq!(
            ctl.execute(&Command::new(CommandId::NAV_ENTER_FOLDER).with_path("/d")).unwrap(),
            CommandOutcome::Navigated
        );
        assert_eq!(ctl.state().path(), &path("/d"));

        assert_eq!(ctl.execute(&Command::new(CommandId::NAV_HOME)).unwrap(), CommandOutcome::Navigated);
        assert!(ctl.state().path().is_root());

        assert!(matches!(
            ctl.execute(&Command::new(CommandId::NAV_BREADCRUMB)),
            Err(AppError::MissingParameter { .. })
        ));
        assert_eq!(ctl.execute(&Command::new(CommandId::NAV_UP_FOLDER)).unwrap(), CommandOutcome::Unchanged);
        assert_eq!(ctl.execute(&Command::new(CommandId::APP_QUIT)).unwrap(), CommandOutcome::Quit);
        assert_eq!(
            ctl.execute(&Command::new("view.zoom_in")).unwrap_err(),
            AppError::UnknownCommand("view.zoom_in".into())
        );
    }
}
