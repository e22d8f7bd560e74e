//! CLI command definitions

use clap::Parser;
use helix_domain::{Mode, OutputFormat};
use std::path::PathBuf;

/// CLI arguments for helix-council
#[derive(Parser, Debug)]
#[command(name = "helix-council")]
#[command(
    author,
    version,
    about = "Multi-agent consensus for chat, code and bioinformatics tasks"
)]
#[command(long_about = r#"
Helix Council sends every task to a panel of agents and lets a judge
reconcile their answers.

A run has two phases:
1. Fan-out: a fast primary agent, a deep-research agent (web grounded) and a
   local verifier (on-device model via Ollama) answer in parallel
2. Judge: a judge model reads every answer and writes the final one

Agent failures never abort a run; only a judge failure does.

Modes: chat, code-fix, code-explain, code-generate, sequence-analysis,
dataset-search, qc-verification

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./helix.toml        Project-level config
3. ~/.config/helix-council/config.toml   Global config

Example:
  helix-council "What does a high duplication rate in RNA-seq indicate?"
  helix-council --mode code-fix --lang python "def f(x) return x"
  helix-council --mode sequence-analysis ">seq1
ATGGCGTACGTTAGC"
  helix-council --chat
"#)]
pub struct Cli {
    /// The task to send to the council (not required in chat mode)
    pub task: Option<String>,

    /// Task mode
    #[arg(short, long, default_value = "chat", value_name = "MODE")]
    pub mode: Mode,

    /// Programming language hint for the code modes
    #[arg(short, long, value_name = "LANG")]
    pub lang: Option<String>,

    /// Output format: final, full or json (default from config, else final)
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Do not load or use the local model
    #[arg(long)]
    pub no_local: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
