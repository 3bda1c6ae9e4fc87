use crate::config::Config;
use crate::files::OpenDocument;
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct FmtArgs {
    /// Markup file to format
    pub file: PathBuf,

    /// Rewrite the file instead of printing to stdout
    #[arg(short, long)]
    pub write: bool,
}

pub fn fmt(args: FmtArgs, config: &Config) -> Result<()> {
    let mut document = OpenDocument::load(&args.file, config)?;
    if !matches!(document, OpenDocument::Markup(_)) {
        bail!("{} is not a markup document", args.file.display());
    }

    if args.write {
        document.save(config)?;
        println!("{} Formatted {}", "✓".green(), args.file.display());
    } else {
        print!("{}", document.render(config));
    }
    Ok(())
}
