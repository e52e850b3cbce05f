//! Interactive shell: reads commands from stdin and drives the controller

use crate::view;
use anyhow::Result;
use app_core::{AppConfig, Breadcrumb, BrowseController, BrowseEntry, Command, CommandId, CommandOutcome, Preview};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

/// One parsed line of user input
#[derive(Debug, Clone)]
pub enum Input {
    Blank,
    List,
    Help,
    Play,
    Run(Command),
}

/// Input the shell could not turn into a command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(String),

    #[error("Not a number: {0}")]
    NotANumber(String),

    #[error("No entry {index}; this folder lists {count}")]
    NoSuchIndex { index: usize, count: usize },

    #[error("No entry named {0}")]
    NoSuchName(String),

    #[error("No breadcrumb [{index}]; this path has {count} (use `home` for the top)")]
    NoSuchCrumb { index: usize, count: usize },
}

enum Event {
    Line(Option<String>),
    Fetched(app_core::FetchCompletion),
}

/// Run the shell until `quit` or end of input
pub async fn run(config: AppConfig) -> Result<()> {
    let mut controller = app_core::connect(&config)?;

    println!("{}", view::banner(&config.backend.base_url));
    controller.start();
    print!("{}", view::render_state(controller.state()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let event = tokio::select! {
            line = lines.next_line() => Event::Line(line?),
            Some(done) = controller.next_completion() => Event::Fetched(done),
        };

        match event {
            Event::Fetched(done) => {
                if controller.apply(done) {
                    print!("{}", view::render_state(controller.state()));
                    if controller.state().error().is_some() {
                        println!("Type `reload` to try again.");
                    }
                }
            }
            Event::Line(None) => break,
            Event::Line(Some(line)) => {
                if !handle_line(&mut controller, &config, &line)? {
                    break;
                }
                // Listings that landed while the line was handled
                if controller.drain_completions() > 0 {
                    print!("{}", view::render_state(controller.state()));
                }
            }
        }
    }

    tracing::info!("Browsera shutting down");
    Ok(())
}

/// Handle one input line; false ends the session
fn handle_line(controller: &mut BrowseController, config: &AppConfig, line: &str) -> Result<bool> {
    let input = {
        let state = controller.state();
        let entries = state.entries();
        parse(line, config, &entries, &state.breadcrumbs())
    };

    let input = match input {
        Ok(input) => input,
        Err(e) => {
            println!("{}", e);
            return Ok(true);
        }
    };

    match input {
        Input::Blank => {}
        Input::List => print!("{}", view::render_state(controller.state())),
        Input::Help => println!("{}", view::help()),
        Input::Play => match controller.preview() {
            Some(preview) => play(&preview, config),
            None => println!("No file is open"),
        },
        Input::Run(command) if command.id.as_str() == CommandId::NAV_BACK && !controller.can_go_back() => {
            println!("No earlier folder");
        }
        Input::Run(command) if command.id.as_str() == CommandId::NAV_FORWARD && !controller.can_go_forward() => {
            println!("No later folder");
        }
        Input::Run(command) => match controller.execute(&command) {
            Ok(CommandOutcome::Quit) => return Ok(false),
            Ok(CommandOutcome::Navigated) => print!("{}", view::render_state(controller.state())),
            Ok(CommandOutcome::Unchanged) => println!("Nothing to do"),
            Ok(CommandOutcome::Opened(preview)) => {
                println!("{}", view::render_preview(&preview));
                if let Some(line) = view::render_download(controller.state(), controller.resolver()) {
                    println!("{}", line);
                }
            }
            Ok(CommandOutcome::Closed) => println!("Closed"),
            Err(e) if e.is_fatal() => {
                tracing::error!("Aborting session: {}", e);
                return Err(e.into());
            }
            Err(e) => println!("{}", e.user_message()),
        },
    }

    Ok(true)
}

/// Hand the opened file to the system viewer, or print where it lives
fn play(preview: &Preview, config: &AppConfig) {
    match preview {
        Preview::Media(media) if config.general.open_with_system_viewer => {
            tracing::info!("Opening {} in the system viewer", media.source_url);
            if let Err(e) = open::that(&media.source_url) {
                tracing::warn!("System viewer failed: {}", e);
                println!("Could not start a viewer: {}", e);
                println!("{}", view::render_preview(preview));
            }
        }
        _ => println!("{}", view::render_preview(preview)),
    }
}

/// Parse one line against the listing currently shown
///
/// `crumb <k>` picks the segment breadcrumb labelled `[k]`.
pub fn parse(
    line: &str,
    config: &AppConfig,
    entries: &[BrowseEntry<'_>],
    crumbs: &[Breadcrumb],
) -> Result<Input, InputError> {
    let line = line.trim();
    let (word, arg) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, Some(rest.trim()).filter(|s| !s.is_empty())),
        None => (line, None),
    };

    match word.to_lowercase().as_str() {
        "" => return Ok(Input::Blank),
        "ls" => return Ok(Input::List),
        "help" | "?" => return Ok(Input::Help),
        "play" | "p" => return Ok(Input::Play),
        _ => {}
    }

    let id = config
        .command_for_alias(word)
        .ok_or_else(|| InputError::Unknown(word.to_string()))?;

    let command = match id {
        CommandId::NAV_ENTER_FOLDER | CommandId::FILE_OPEN => {
            let arg = arg.ok_or_else(|| InputError::MissingArgument(word.to_string()))?;
            target(find_entry(arg, entries)?)
        }
        CommandId::NAV_BREADCRUMB => {
            let arg = arg.ok_or_else(|| InputError::MissingArgument(word.to_string()))?;
            let index: usize = arg.parse().map_err(|_| InputError::NotANumber(arg.to_string()))?;
            crumbs
                .iter()
                .find(|crumb| crumb.index() == Some(index))
                .map(Breadcrumb::command)
                .ok_or(InputError::NoSuchCrumb {
                    index,
                    count: crumbs.iter().filter(|crumb| crumb.index().is_some()).count(),
                })?
        }
        other => Command::new(other),
    };

    Ok(Input::Run(command))
}

/// A listed row by 1-based number or exact name
fn find_entry<'e, 'a>(arg: &str, entries: &'e [BrowseEntry<'a>]) -> Result<&'e BrowseEntry<'a>, InputError> {
    if let Ok(number) = arg.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|i| entries.get(i))
            .ok_or(InputError::NoSuchIndex {
                index: number,
                count: entries.len(),
            });
    }

    entries
        .iter()
        .find(|entry| entry.name() == arg)
        .ok_or_else(|| InputError::NoSuchName(arg.to_string()))
}

/// Folders are entered, files are opened
fn target(entry: &BrowseEntry<'_>) -> Command {
    match entry {
        BrowseEntry::File(file) => Command::new(CommandId::FILE_OPEN).with_path(&file.file_path),
        BrowseEntry::Directory { raw, .. } => Command::new(CommandId::NAV_ENTER_FOLDER).with_path(raw),
    }
}
