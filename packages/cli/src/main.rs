mod commands;
mod config;
mod files;
mod script;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{edit, fmt, show, tree, EditArgs, FmtArgs, ShowArgs, TreeArgs};
use config::Config;
use tracing_subscriber::EnvFilter;

/// Quill - text and markup editing with undo
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log every edit event
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print lines with their numbers
    Show(ShowArgs),

    /// Print the element tree of a markup file
    Tree(TreeArgs),

    /// Re-serialize a markup file
    Fmt(FmtArgs),

    /// Apply edit operations to a file
    Edit(EditArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = Config::load(&cwd)?;

    match cli.command {
        Command::Show(args) => show(args, &config),
        Command::Tree(args) => tree(args, &config),
        Command::Fmt(args) => fmt(args, &config),
        Command::Edit(args) => edit(args, &config, cli.log),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_edit_invocation() {
        let cli = Cli::try_parse_from([
            "quill",
            "edit",
            "notes.txt",
            "-e",
            "append \"x\"",
            "-e",
            "undo",
            "--dry-run",
            "--log",
        ])
        .unwrap();

        assert!(cli.log);
        match cli.command {
            Command::Edit(args) => {
                assert_eq!(args.ops, vec!["append \"x\"", "undo"]);
                assert!(args.dry_run);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_show_range() {
        let cli = Cli::try_parse_from(["quill", "show", "a.txt", "--range", "2:-1"]).unwrap();
        match cli.command {
            Command::Show(args) => {
                assert_eq!(args.range.start, 2);
                assert_eq!(args.range.end, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(Cli::try_parse_from(["quill", "show", "a.txt", "--range", "x"]).is_err());
    }
}
