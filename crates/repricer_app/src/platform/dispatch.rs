use chrono::{DateTime, Local};
use engine_logging::engine_info;
use repricer_core::{JobState, OperatorId, StopOutcome};
use repricer_engine::JobManager;
use tokio::runtime::Handle;

use super::commands::Command;

pub const HELP_TEXT: &str = "Available commands:\n\
/help - show this message\n\
/listdocs - list the available spreadsheets\n\
/setdoc <document name> - select the spreadsheet to write prices into\n\
/getdoc - show the selected spreadsheet\n\
/parse - start parsing and writing data into the spreadsheet\n\
/status - show whether parsing is running\n\
/stop - stop parsing\n\
/quit - exit";

/// Turns operator commands into job manager calls and textual replies.
pub struct Dispatcher {
    manager: JobManager,
    runtime: Handle,
    operator: OperatorId,
    started_at: Option<DateTime<Local>>,
}

impl Dispatcher {
    pub fn new(manager: JobManager, runtime: Handle, operator: OperatorId) -> Self {
        Self {
            manager,
            runtime,
            operator,
            started_at: None,
        }
    }

    /// Handles one command. Must be called from outside the async runtime;
    /// document lookups block on it.
    pub fn handle(&mut self, command: Command) -> String {
        match command {
            Command::Greet => {
                "Hello! I control the listing parser. Use /setdoc to choose a document.".to_string()
            }
            Command::Parse => match self.manager.request_start(&self.operator) {
                Ok(_handle) => {
                    self.started_at = Some(Local::now());
                    "Parsing started!".to_string()
                }
                Err(err) => err.to_string(),
            },
            Command::Stop => match self.manager.request_stop() {
                StopOutcome::Signalled => "Parsing stopped.".to_string(),
                StopOutcome::AlreadyStopping => "Parsing is already stopping.".to_string(),
                StopOutcome::NotRunning => "The parser is not running.".to_string(),
            },
            Command::Status => self.status(),
            Command::SetDoc(name) => {
                match self
                    .runtime
                    .block_on(self.manager.select_document(&self.operator, &name))
                {
                    Ok(document) => format!(
                        "Document '{}' selected! Use /parse to start parsing.",
                        document.name
                    ),
                    Err(err) => format!("Could not find document '{name}'. Error: {err}"),
                }
            }
            Command::SetDocMissingName => {
                "Please give a document name: /setdoc <document name>".to_string()
            }
            Command::GetDoc => match self.manager.current_document(&self.operator) {
                Some(document) => format!("Current document: '{}'", document.name),
                None => "No document selected. Use /setdoc <document name>.".to_string(),
            },
            Command::ListDocs => match self.runtime.block_on(self.manager.list_documents()) {
                Ok(documents) if documents.is_empty() => {
                    "You have no documents available.".to_string()
                }
                Ok(documents) => {
                    let lines: Vec<String> = documents
                        .iter()
                        .enumerate()
                        .map(|(i, document)| format!("{}. {}", i + 1, document.name))
                        .collect();
                    format!("Available documents:\n{}", lines.join("\n"))
                }
                Err(err) => format!("Could not list documents. Error: {err}"),
            },
            Command::Help => HELP_TEXT.to_string(),
            Command::Quit => "Bye.".to_string(),
            Command::Unknown(word) => format!("Unknown command '{word}'. Use /help."),
        }
    }

    /// Asks a running job to stop before the process exits.
    pub fn shutdown(&self) {
        if self.manager.request_stop() == StopOutcome::Signalled {
            engine_info!("Stopping the running job on exit");
        }
    }

    fn status(&self) -> String {
        match self.manager.query_status() {
            JobState::Running => match self.started_at {
                Some(started) => {
                    format!("Parsing is running (started {}).", started.format("%H:%M:%S"))
                }
                None => "Parsing is running.".to_string(),
            },
            JobState::Cancelled => "Parsing is stopping.".to_string(),
            JobState::Idle => "The parser is ready.".to_string(),
        }
    }
}
