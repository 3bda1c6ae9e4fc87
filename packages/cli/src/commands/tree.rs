use crate::config::Config;
use crate::files::OpenDocument;
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Markup file to outline
    pub file: PathBuf,
}

pub fn tree(args: TreeArgs, config: &Config) -> Result<()> {
    let OpenDocument::Markup(doc) = OpenDocument::load(&args.file, config)? else {
        bail!("{} is not a markup document", args.file.display());
    };

    let outline = doc.outline();
    if outline.is_empty() {
        println!("{}", "(empty document)".dimmed());
    } else {
        print!("{}", outline);
    }
    Ok(())
}
