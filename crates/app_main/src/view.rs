//! Plain-text rendering of the browse state

use app_core::{
    download_url, Breadcrumb, BrowseEntry, BrowseState, DisplayCondition, EndpointResolver, Preview,
};
use std::fmt::Write;

const CRUMB_SEPARATOR: &str = " › ";

/// Breadcrumb bar, `None` at the root
pub fn breadcrumb_bar(crumbs: &[Breadcrumb]) -> Option<String> {
    if crumbs.is_empty() {
        return None;
    }

    let parts: Vec<String> = crumbs
        .iter()
        .map(|crumb| match crumb.index() {
            Some(index) => format!("[{}] {}", index, crumb.label),
            None => crumb.label.clone(),
        })
        .collect();
    Some(parts.join(CRUMB_SEPARATOR))
}

/// One numbered row; `number` is 1-based
pub fn entry_line(number: usize, entry: &BrowseEntry<'_>) -> String {
    match entry {
        BrowseEntry::File(file) => format!("{:>3}. {}  ({})", number, file.file_name, file.file_path),
        BrowseEntry::Directory { name, .. } => format!("{:>3}. {}/", number, name),
    }
}

/// The whole listing screen
pub fn render_state(state: &BrowseState) -> String {
    let mut out = String::new();

    if let Some(bar) = breadcrumb_bar(&state.breadcrumbs()) {
        let _ = writeln!(out, "{}", bar);
    }

    match state.display() {
        DisplayCondition::Idle => {}
        DisplayCondition::Loading => {
            let _ = writeln!(out, "Loading...");
        }
        DisplayCondition::Failed(message) => {
            let _ = writeln!(out, "Error: {}", message);
        }
        DisplayCondition::Empty => {
            let _ = writeln!(out, "No resources available.");
        }
        DisplayCondition::Entries(entries) => {
            for (i, entry) in entries.iter().enumerate() {
                let _ = writeln!(out, "{}", entry_line(i + 1, entry));
            }
            let _ = writeln!(out, "{} items", entries.len());
        }
    }

    if let Some(file) = state.selection().current() {
        let _ = writeln!(out, "Open: {}", file.file_name);
    }

    out
}

/// What `open` and `play` show for a file
pub fn render_preview(preview: &Preview) -> String {
    match preview {
        Preview::Media(media) => format!("[{}] {}", media.kind, media.source_url),
        Preview::Unsupported { file_name } => format!("{}: Unsupported file type", file_name),
    }
}

/// Download link line for the opened file, if it has one
pub fn render_download(state: &BrowseState, resolver: &EndpointResolver) -> Option<String> {
    let file = state.selection().current()?;
    download_url(file, resolver).map(|url| format!("Download: {}", url))
}

pub fn banner(base_url: &str) -> String {
    format!("Browsera {} - {}\nType `help` for commands.", env!("CARGO_PKG_VERSION"), base_url)
}

pub fn help() -> &'static str {
    "\
Commands:
  ls                 show the current folder again
  cd <n|name>        enter a folder (or open a file)
  open <n|name>      open a file (or enter a folder)
  play               hand the opened file to the system viewer
  close              close the opened file
  up                 go to the parent folder
  crumb <k>          jump to breadcrumb [k] (its folder)
  home               go to the top folder
  back / fwd         move through history
  reload             fetch the current folder again
  help               this text
  quit               leave"
}
