//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Bookbot - automated space booking
///
/// Books the first available space from a ranked preference list on a
/// Skedda-style scheduling service, one attempt per invocation.
#[derive(Parser, Debug)]
#[command(
    name = "bookbot",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Automated first-available space booking for Skedda-style venues",
    long_about = "Bookbot computes a target date in the venue timezone, reads the day's \
                  occupancy, picks the first free space from your ranked preference list, \
                  and issues exactly one booking attempt. Designed to run from cron or CI \
                  on a recurring trigger.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  bookbot                        \x1b[90m# Book 14 days ahead with configured preferences\x1b[0m\n   \
                  bookbot --days-ahead 0         \x1b[90m# Book for today\x1b[0m\n   \
                  bookbot --dry-run              \x1b[90m# Show what would be booked without booking\x1b[0m\n   \
                  bookbot setup                  \x1b[90m# Write a bookbot.json configuration template\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    #[command(flatten)]
    pub book: BookArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one booking attempt (the default when no subcommand is given)
    Book(BookArgs),

    /// Write a bookbot.json configuration template
    Setup(SetupArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the book command
#[derive(Args, Debug, Default, Clone)]
pub struct BookArgs {
    /// How many days ahead to book (0 = today in the venue timezone)
    #[arg(long, env = "BOOKBOT_DAYS_AHEAD")]
    pub days_ahead: Option<u32>,

    /// IANA timezone for target-date arithmetic (e.g. Australia/Melbourne)
    #[arg(long, env = "BOOKBOT_TIMEZONE")]
    pub timezone: Option<String>,

    /// Directory holding bookbot.json (defaults to the current directory)
    #[arg(long, short = 'w', env = "BOOKBOT_WORKDIR")]
    pub workdir: Option<PathBuf>,

    /// Evaluate availability and selection but skip the booking write
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the setup command
#[derive(Args, Debug, Default)]
pub struct SetupArgs {
    /// Overwrite an existing bookbot.json
    #[arg(long)]
    pub force: bool,

    /// Directory to write the template into (defaults to the current directory)
    #[arg(long, short = 'w')]
    pub workdir: Option<PathBuf>,
}

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
