//! Interactive browse session
//!
//! Owns the loaded hierarchy for the lifetime of one browsing run and applies
//! user commands one at a time.

use thiserror::Error;
use tracing::{debug, instrument};

use crate::application::services::{
    parse_level_input, DocumentLookup, DocumentReport, LevelControls, LoadedHierarchy,
    VisibilityController,
};
use crate::application::ApplicationResult;
use crate::domain::{DisplayWindow, RangeError, SummaryMetadata};

pub const HELP: &str = "\
levels [TOP] [BOTTOM]  show levels TOP..BOTTOM (blank TOP = too large, blank BOTTOM = 1)
filter TEXT            show only nodes whose label contains TEXT
clear                  remove the filter
select ID              list the documents of a node
show                   print the tree again
help                   this text
quit                   leave";

/// A line that is not a valid session command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CommandParseError {
    pub message: String,
}

impl CommandParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Levels {
        top: Option<i64>,
        bottom: Option<i64>,
    },
    Filter(String),
    Clear,
    Select(String),
    Show,
    Help,
    Quit,
}

impl SessionCommand {
    pub fn parse(line: &str) -> Result<Self, CommandParseError> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(v, r)| (v, r.trim()))
            .unwrap_or((line, ""));

        match verb.to_lowercase().as_str() {
            "levels" | "l" => {
                let mut args = rest.split_whitespace();
                let top = Self::level_arg(args.next())?;
                let bottom = Self::level_arg(args.next())?;
                if args.next().is_some() {
                    return Err(CommandParseError::new("usage: levels [TOP] [BOTTOM]"));
                }
                Ok(SessionCommand::Levels { top, bottom })
            }
            "filter" | "f" | "search" => {
                if rest.is_empty() {
                    Ok(SessionCommand::Clear)
                } else {
                    Ok(SessionCommand::Filter(rest.to_string()))
                }
            }
            "clear" | "c" => Ok(SessionCommand::Clear),
            "select" | "s" | "docs" => {
                if rest.is_empty() {
                    Err(CommandParseError::new("usage: select ID"))
                } else {
                    Ok(SessionCommand::Select(rest.to_string()))
                }
            }
            "show" | "" => Ok(SessionCommand::Show),
            "help" | "h" | "?" => Ok(SessionCommand::Help),
            "quit" | "q" | "exit" => Ok(SessionCommand::Quit),
            other => Err(CommandParseError::new(format!(
                "unknown command: {} (try 'help')",
                other
            ))),
        }
    }

    fn level_arg(arg: Option<&str>) -> Result<Option<i64>, CommandParseError> {
        match arg {
            None => Ok(None),
            Some(raw) => parse_level_input(raw)
                .map_err(|_| CommandParseError::new(format!("not a level number: {}", raw))),
        }
    }
}

/// What a command did, for the caller to present.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Rendered(DisplayWindow),
    Rejected(RangeError),
    Filtered { text: String, matches: usize },
    Cleared,
    Documents(DocumentReport),
    LookupUnavailable { node_id: String, message: String },
    Shown,
    Help,
    Quit,
    Usage(String),
}

pub struct BrowseSession {
    controller: VisibilityController,
    controls: LevelControls,
    metadata: SummaryMetadata,
    lookup: DocumentLookup,
}

impl BrowseSession {
    /// Build the controller from a loaded hierarchy and render the initial window.
    pub fn start(loaded: LoadedHierarchy, lookup: DocumentLookup) -> ApplicationResult<Self> {
        let metadata = loaded.metadata;
        let mut controller = VisibilityController::from_loaded(loaded);
        let controls = LevelControls::initialize(&mut controller)?;
        Ok(Self {
            controller,
            controls,
            metadata,
            lookup,
        })
    }

    pub fn controller(&self) -> &VisibilityController {
        &self.controller
    }

    pub fn controls(&self) -> &LevelControls {
        &self.controls
    }

    pub fn metadata(&self) -> &SummaryMetadata {
        &self.metadata
    }

    pub async fn handle_line(&mut self, line: &str) -> SessionOutcome {
        match SessionCommand::parse(line) {
            Ok(command) => self.handle(command).await,
            Err(e) => SessionOutcome::Usage(e.message),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn handle(&mut self, command: SessionCommand) -> SessionOutcome {
        match command {
            SessionCommand::Levels { top, bottom } => {
                match self.controls.apply(&mut self.controller, top, bottom) {
                    Ok(window) => SessionOutcome::Rendered(window),
                    Err(e) => SessionOutcome::Rejected(e),
                }
            }
            SessionCommand::Filter(text) => {
                let matches = self.controller.search(&text);
                debug!("filter '{}' matched {} nodes", text, matches);
                SessionOutcome::Filtered { text, matches }
            }
            SessionCommand::Clear => {
                self.controller.clear_search();
                SessionOutcome::Cleared
            }
            SessionCommand::Select(node_id) => self.select(&node_id).await,
            SessionCommand::Show => SessionOutcome::Shown,
            SessionCommand::Help => SessionOutcome::Help,
            SessionCommand::Quit => SessionOutcome::Quit,
        }
    }

    async fn select(&self, node_id: &str) -> SessionOutcome {
        let Some(node) = self.controller.node(node_id) else {
            return SessionOutcome::Usage(format!("unknown node: {}", node_id));
        };
        match self.lookup.report(&node.data, &self.metadata).await {
            Ok(report) => SessionOutcome::Documents(report),
            Err(e) => SessionOutcome::LookupUnavailable {
                node_id: node_id.to_string(),
                message: e.to_string(),
            },
        }
    }
}
