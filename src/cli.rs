//! Command-line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "msgprep",
    about = "Normalise captured console-API packets into display-ready messages"
)]
pub struct Cli {
    /// Log pipeline activity to stderr at debug level (RUST_LOG overrides).
    #[arg(long, global = true)]
    pub debug: bool,

    /// Read configuration from PATH instead of ~/.config/msgprep/config.toml.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the fixture's keys in registry order.
    Keys(Target),
    /// Print records as stored.
    Raw(ViewArgs),
    /// Print records with every object reference resolved.
    Packets(ViewArgs),
    /// Print prepared messages.
    Prepare(ViewArgs),
    /// Prepare every record and report failures; exits non-zero if any.
    Check(Target),
}

impl Command {
    pub fn target(&self) -> &Target {
        match self {
            Command::Keys(target) | Command::Check(target) => target,
            Command::Raw(args) | Command::Packets(args) | Command::Prepare(args) => &args.target,
        }
    }
}

#[derive(Debug, Args)]
pub struct Target {
    /// Fixture file, or `-` for stdin.
    #[arg(value_name = "FIXTURE")]
    pub fixture: String,

    /// Reject duplicate keys instead of overwriting.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct ViewArgs {
    #[command(flatten)]
    pub target: Target,

    /// Print only the entry under KEY.
    #[arg(long, value_name = "KEY")]
    pub key: Option<String>,

    /// Message id policy; defaults to the configured one.
    #[arg(long, value_enum)]
    pub ids: Option<IdsArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IdsArg {
    Fixed,
    Sequential,
}
