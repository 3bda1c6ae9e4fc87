use crate::config::Config;
use crate::files::OpenDocument;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use quill_editor::{ShowRange, TextBuffer};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// File to display
    pub file: PathBuf,

    /// Inclusive line range, e.g. 3:10 or 5:-1 for "to the end"
    #[arg(short, long, default_value = "1:-1")]
    pub range: ShowRange,
}

pub fn show(args: ShowArgs, config: &Config) -> Result<()> {
    let document = OpenDocument::load(&args.file, config)?;

    let rows: Vec<String> = match &document {
        OpenDocument::Text(doc) => doc.show(args.range).collect(),
        // Markup is shown as it would be saved
        OpenDocument::Markup(_) => {
            let rendered = TextBuffer::from_source(&document.render(config));
            rendered.show(args.range).collect()
        }
    };

    if rows.is_empty() {
        println!("{}", "(no lines in range)".dimmed());
    }
    for row in rows {
        println!("{}", row);
    }
    Ok(())
}
