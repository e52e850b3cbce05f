//! Command system for user actions

use crate::Preview;
use serde::{Deserialize, Serialize};

/// Command identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandId(pub String);

impl CommandId {
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    // Navigation commands
    pub const NAV_HOME: &'static str = "nav.home";
    pub const NAV_BREADCRUMB: &'static str = "nav.breadcrumb";
    pub const NAV_UP_FOLDER: &'static str = "nav.up_folder";
    pub const NAV_ENTER_FOLDER: &'static str = "nav.enter_folder";
    pub const NAV_BACK: &'static str = "nav.back";
    pub const NAV_FORWARD: &'static str = "nav.forward";
    pub const NAV_RELOAD: &'static str = "nav.reload";

    // File commands
    pub const FILE_OPEN: &'static str = "file.open";
    pub const FILE_CLOSE: &'static str = "file.close";

    // App commands
    pub const APP_QUIT: &'static str = "app.quit";
}

/// Command with optional parameters
#[derive(Debug, Clone)]
pub struct Command {
    pub id: CommandId,
    pub params: CommandParams,
}

/// Command parameters
#[derive(Debug, Clone, Default)]
pub struct CommandParams {
    /// Segment index for `nav.breadcrumb`: `[a, b, c]`, 1 -> `[a, b]`
    pub int_value: Option<i64>,
    /// Directory entry for `nav.enter_folder`, file identity for `file.open`
    pub path_value: Option<String>,
}

impl Command {
    pub fn new(id: &str) -> Self {
        Self {
            id: CommandId::new(id),
            params: CommandParams::default(),
        }
    }

    pub fn with_int(mut self, value: i64) -> Self {
        self.params.int_value = Some(value);
        self
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.params.path_value = Some(path.to_string());
        self
    }
}

/// What executing a command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A new listing fetch was started
    Navigated,
    /// Nothing to do (e.g. `nav.back` with empty history)
    Unchanged,
    /// A file was opened; render this
    Opened(Preview),
    Closed,
    Quit,
}
