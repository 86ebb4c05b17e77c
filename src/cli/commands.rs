//! Command dispatch

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, instrument};

use crate::application::services::{LevelControls, VisibilityController};
use crate::application::session::HELP;
use crate::application::{ApplicationError, BrowseSession, SessionOutcome};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::sources::is_http_source;
use crate::infrastructure::InfraError;

pub async fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show {
            top,
            bottom,
            filter,
        }) => _show(cli, *top, *bottom, filter.as_deref()).await,
        Some(Commands::Levels) => _levels(cli).await,
        Some(Commands::Docs { id }) => _docs(cli, id).await,
        Some(Commands::Browse) => _browse(cli).await,
        Some(Commands::Config { command }) => _config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => _show(cli, None, None, None).await,
    }
}

/// Directory holding the local config file, if the source is a directory.
fn local_dir(cli: &Cli) -> Option<PathBuf> {
    match cli.source.as_deref() {
        Some(s) if is_http_source(s) => None,
        Some(s) => Some(PathBuf::from(s)),
        None => Some(PathBuf::from(".")),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = local_dir(cli);
    let mut settings = Settings::load(dir.as_deref())?;
    if let Some(source) = &cli.source {
        settings.source = source.clone();
    }
    if cli.no_color || !settings.color {
        colored::control::set_override(false);
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

async fn load_controller(
    container: &ServiceContainer,
) -> CliResult<(VisibilityController, LevelControls)> {
    let loaded = container.loader().load().await?;
    let mut controller = VisibilityController::from_loaded(loaded);
    let controls = LevelControls::initialize(&mut controller).map_err(ApplicationError::from)?;
    Ok((controller, controls))
}

#[instrument(skip(cli))]
async fn _show(
    cli: &Cli,
    top: Option<i64>,
    bottom: Option<i64>,
    filter: Option<&str>,
) -> CliResult<()> {
    let container = ServiceContainer::new(load_settings(cli)?)?;
    let (mut controller, mut controls) = load_controller(&container).await?;

    // Unset flags keep the initial input values
    if top.is_some() || bottom.is_some() {
        let top = top.unwrap_or(controls.top_input());
        let bottom = bottom.unwrap_or(controls.bottom_input());
        controls
            .apply(&mut controller, Some(top), Some(bottom))
            .map_err(|e| CliError::InvalidArgs(e.to_string()))?;
    }
    if let Some(text) = filter {
        controller.search(text);
    }
    if let Some(widget) = controller.widget() {
        output::tree(widget);
    }
    Ok(())
}

#[instrument(skip(cli))]
async fn _levels(cli: &Cli) -> CliResult<()> {
    let container = ServiceContainer::new(load_settings(cli)?)?;
    let loaded = container.loader().load().await?;
    let controller = VisibilityController::from_loaded(loaded);
    output::levels(&controller);
    Ok(())
}

#[instrument(skip(cli))]
async fn _docs(cli: &Cli, id: &str) -> CliResult<()> {
    let container = ServiceContainer::new(load_settings(cli)?)?;
    let session = container
        .loader()
        .load_then(|loaded| BrowseSession::start(loaded, container.lookup()))
        .await??;
    let node = session
        .controller()
        .node(id)
        .ok_or_else(|| CliError::Usage(format!("unknown node: {}", id)))?;
    let report = container
        .lookup()
        .report(&node.data, session.metadata())
        .await?;
    output::document_report(&report);
    Ok(())
}

#[instrument(skip(cli))]
async fn _browse(cli: &Cli) -> CliResult<()> {
    let container = ServiceContainer::new(load_settings(cli)?)?;
    let mut session = container
        .loader()
        .load_then(|loaded| BrowseSession::start(loaded, container.lookup()))
        .await??;

    present(&session, &SessionOutcome::Shown);
    output::detail(&"type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        output::prompt(&">");
        let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| InfraError::io("read command", e))?
        else {
            break;
        };
        let outcome = session.handle_line(&line).await;
        if outcome == SessionOutcome::Quit {
            break;
        }
        present(&session, &outcome);
    }
    Ok(())
}

fn present(session: &BrowseSession, outcome: &SessionOutcome) {
    let show_tree = || {
        if let Some(widget) = session.controller().widget() {
            output::tree(widget);
        }
    };
    match outcome {
        SessionOutcome::Rendered(_) | SessionOutcome::Cleared | SessionOutcome::Shown => {
            show_tree();
            output::inputs(session.controls());
        }
        SessionOutcome::Rejected(e) => {
            output::warning(e);
            output::inputs(session.controls());
        }
        SessionOutcome::Filtered { text, matches } => {
            show_tree();
            output::detail(&format!("{} topics match '{}'", matches, text));
        }
        SessionOutcome::Documents(report) => output::document_report(report),
        SessionOutcome::LookupUnavailable { node_id, message } => {
            output::error(&format!("Document information is not available for {}.", node_id));
            output::detail(message);
        }
        SessionOutcome::Help => output::info(HELP),
        SessionOutcome::Usage(msg) => output::warning(msg),
        SessionOutcome::Quit => {}
    }
}

fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&format!("global: {}", path.display())),
                None => output::info(&"global: <unavailable>"),
            }
            if let Some(dir) = local_dir(cli) {
                output::info(&format!("local:  {}", local_config_path(&dir).display()));
            }
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
