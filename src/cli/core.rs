//! Shell context, dispatch and error reporting.

use std::{io, path::PathBuf};

use dialoguer::theme::ColorfulTheme;
use recruit_config::{Config, ConfigError, ConfigManager};
use recruit_core::{
    AssistantDesk, Clipboard, CoreError, ExportContext, FlowContext, MemoryFieldStore,
    StepWizard, SystemClock,
};
use recruit_storage_json::{DirectoryExporter, JsonKeyValueStore};
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use super::assistant;
use super::clipboard::terminal_clipboard;
use super::commands;
use super::io as cli_io;
use super::notifier::ConsoleNotifier;
use super::registry::{CommandEntry, CommandRegistry};
use crate::utils::paths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Everything one shell session owns.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub home: PathBuf,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub fields: MemoryFieldStore,
    pub wizard: StepWizard,
    pub desk: AssistantDesk,
    pub sessions: JsonKeyValueStore,
    pub exporter: DirectoryExporter,
    pub clipboard: Box<dyn Clipboard>,
    pub notifier: ConsoleNotifier,
    pub clock: SystemClock,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_home(mode, paths::app_data_dir())
    }

    pub fn with_home(mode: CliMode, home: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(home.clone())?;
        let config = config_manager.load()?;
        cli_io::apply_config(&config);

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let sessions = JsonKeyValueStore::new(paths::sessions_dir(&home))?;
        let exporter = DirectoryExporter::new(config.resolve_export_dir());
        let mut notifier = ConsoleNotifier::new();
        let desk = assistant::build_desk(&config, &home, &mut notifier);

        tracing::info!(home = %home.display(), assistants = desk.targets().count(), "shell ready");

        Ok(ShellContext {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            home,
            config_manager,
            config,
            fields: MemoryFieldStore::new(),
            wizard: StepWizard::new(),
            desk,
            sessions,
            exporter,
            clipboard: terminal_clipboard(),
            notifier,
            clock: SystemClock,
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        format!(
            "recruit [{}/{} {}]> ",
            self.wizard.current() + 1,
            self.wizard.total(),
            self.wizard.current_step().title
        )
    }

    /// Splits the borrows an assistant action needs.
    pub(crate) fn assistant_parts(&mut self) -> (&mut AssistantDesk, FlowContext<'_>) {
        (
            &mut self.desk,
            FlowContext {
                fields: &mut self.fields,
                storage: &mut self.sessions,
                notifier: &mut self.notifier,
                clock: &self.clock,
            },
        )
    }

    pub(crate) fn export_parts(&mut self) -> (&MemoryFieldStore, ExportContext<'_>) {
        (
            &self.fields,
            ExportContext {
                exporter: &mut self.exporter,
                notifier: &mut self.notifier,
                clock: &self.clock,
                prefix: &self.config.export_prefix,
            },
        )
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        self.last_command = Some(line.trim().to_string());
        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));

        let lowered = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &lowered), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{name}`?"));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", false).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error("Command failed: {0}")]
    Command(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn test_context(home: &std::path::Path) -> ShellContext {
    let manager = ConfigManager::with_base_dir(home.to_path_buf()).expect("config manager");
    let config = Config {
        export_dir: Some(home.join("exports")),
        questions_dir: Some(home.join("questions")),
        ..Config::default()
    };
    manager.save(&config).expect("save config");
    ShellContext::with_home(CliMode::Script, home.to_path_buf()).expect("shell context")
}

#[cfg(test)]
pub(crate) fn process_script(context: &mut ShellContext, lines: &[&str]) {
    for line in lines {
        match context.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err).expect("report error"),
        }
    }
}
