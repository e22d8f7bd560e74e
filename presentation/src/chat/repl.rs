//! REPL (Read-Eval-Print Loop) for interactive chat
//!
//! Conversation history lives in the [`ChatSession`] only; it is never
//! written to disk. The line-editor history file stores typed input lines.

use crate::config::ReplConfig;
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::SimpleProgress;
use colored::Colorize;
use helix_application::{NoProgress, RunConsensusError, RunConsensusUseCase};
use helix_domain::{ChatTurn, ConsensusOutcome, DomainError, Mode, Task};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;

/// Number of past turns kept in a session
const MAX_TURNS: usize = 20;

/// Slash commands understood by the REPL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Help,
    Clear,
    Status,
    Mode(Option<Mode>),
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`; other lines are not commands.
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.strip_prefix('/')?;
        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        Some(match name {
            "quit" | "exit" | "q" => ReplCommand::Quit,
            "help" | "h" | "?" => ReplCommand::Help,
            "clear" => ReplCommand::Clear,
            "status" => ReplCommand::Status,
            "mode" => match arg {
                None => ReplCommand::Mode(None),
                Some(value) => match value.parse() {
                    Ok(mode) => ReplCommand::Mode(Some(mode)),
                    Err(_) => ReplCommand::Unknown(line.to_string()),
                },
            },
            _ => ReplCommand::Unknown(line.to_string()),
        })
    }
}

/// In-memory state of one chat session
#[derive(Debug, Clone)]
pub struct ChatSession {
    mode: Mode,
    language: Option<String>,
    history: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            language: None,
            history: Vec::new(),
        }
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Build the task for one input line, carrying the session history
    pub fn task_for(&self, line: &str) -> Result<Task, DomainError> {
        let task = Task::new(line, self.mode)?.with_history(self.history.clone());
        Ok(match &self.language {
            Some(language) => task.with_language(language.clone()),
            None => task,
        })
    }

    /// Remember a judged exchange; failed runs are not added to the history.
    pub fn record(&mut self, line: &str, outcome: &ConsensusOutcome) {
        if !outcome.overall_succeeded {
            return;
        }
        self.history.push(ChatTurn::new(line, outcome.final_text.clone()));
        if self.history.len() > MAX_TURNS {
            let excess = self.history.len() - MAX_TURNS;
            self.history.drain(..excess);
        }
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: Arc<RunConsensusUseCase>,
    session: ChatSession,
    config: ReplConfig,
}

impl ChatRepl {
    pub fn new(use_case: Arc<RunConsensusUseCase>, session: ChatSession) -> Self {
        Self {
            use_case,
            session,
            config: ReplConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = self.config.history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let prompt = format!("{}> ", self.session.mode());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    if let Some(command) = ReplCommand::parse(line) {
                        if self.handle_command(command) {
                            break;
                        }
                        continue;
                    }

                    self.process_line(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│         Helix Council - Chat Mode           │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Mode: {}", self.session.mode().display_name());
        println!("Local model: {}", self.use_case.local_engine().state());
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?     - Show this help");
        println!("  /mode [MODE]      - Show or switch the task mode");
        println!("  /clear            - Forget the conversation so far");
        println!("  /status           - Show mode, history and local model state");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => Self::print_help(),
            ReplCommand::Clear => {
                self.session.clear();
                println!("Conversation cleared.");
            }
            ReplCommand::Status => {
                println!("Mode: {}", self.session.mode().display_name());
                println!("Turns kept: {}", self.session.history().len());
                println!("Local model: {}", self.use_case.local_engine().state());
            }
            ReplCommand::Mode(None) => {
                let modes: Vec<&str> = Mode::ALL.iter().map(|m| m.as_str()).collect();
                println!("Current mode: {}", self.session.mode());
                println!("Available: {}", modes.join(", "));
            }
            ReplCommand::Mode(Some(mode)) => {
                self.session.set_mode(mode);
                println!("Switched to {}.", mode.display_name());
            }
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        false
    }

    async fn process_line(&mut self, line: &str) {
        let task = match self.session.task_for(line) {
            Ok(task) => task,
            Err(e) => {
                eprintln!("{} {}", "Error:".red(), e);
                return;
            }
        };

        println!();
        let result = tokio::select! {
            result = self.execute(&task) => result,
            _ = tokio::signal::ctrl_c() => Err(RunConsensusError::Cancelled),
        };

        match result {
            Ok(outcome) => {
                println!("{}", ConsoleFormatter::format_final(&outcome));
                self.session.record(line, &outcome);
            }
            Err(e) => eprintln!("{} {}", "Stopped:".yellow(), e),
        }
    }

    async fn execute(&self, task: &Task) -> Result<ConsensusOutcome, RunConsensusError> {
        if self.config.show_progress {
            let progress = SimpleProgress::new();
            self.use_case.execute_with_progress(task, &progress).await
        } else {
            self.use_case.execute_with_progress(task, &NoProgress).await
        }
    }
}
