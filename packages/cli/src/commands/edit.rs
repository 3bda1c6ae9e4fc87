use crate::config::Config;
use crate::files::OpenDocument;
use crate::script::{parse_op, script_lines};
use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// File to edit
    pub file: PathBuf,

    /// Operation to apply, e.g. -e 'insert 1:1 "hello"' (repeatable, applied in order)
    #[arg(short = 'e', long = "exec", value_name = "OP")]
    pub ops: Vec<String>,

    /// File with one operation per line; runs after any -e operations
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Print the result instead of saving it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn edit(args: EditArgs, config: &Config, log: bool) -> Result<()> {
    let mut ops: Vec<(String, String)> = args
        .ops
        .iter()
        .enumerate()
        .map(|(i, op)| (format!("-e #{}", i + 1), op.clone()))
        .collect();

    if let Some(script) = &args.script {
        let source = fs::read_to_string(script)
            .with_context(|| format!("Cannot read script {}", script.display()))?;
        ops.extend(
            script_lines(&source)
                .map(|(line, op)| (format!("{}:{}", script.display(), line), op.to_string())),
        );
    }

    if ops.is_empty() {
        bail!("No operations given. Use -e <OP> or --script <FILE>");
    }

    let mut document = OpenDocument::load(&args.file, config)?;
    document.attach_logging(log || config.log);

    // Nothing is written unless every operation succeeds
    for (origin, line) in &ops {
        let op = parse_op(line).map_err(|e| anyhow!("{} ({}): {}", origin, line, e))?;
        let applied = document
            .apply(op)
            .map_err(|e| anyhow!("{} ({}): {}", origin, line, e))?;

        if applied {
            println!("  {} {}", "✓".green(), line);
        } else {
            println!("  {} {} {}", "-".yellow(), line, "(nothing to do)".dimmed());
        }
    }

    if args.dry_run {
        println!();
        print!("{}", document.render(config));
        return Ok(());
    }

    if document.is_dirty() {
        document.save(config)?;
        println!(
            "{} Saved {} ({} operations)",
            "✅".green(),
            args.file.display(),
            ops.len()
        );
    }
    Ok(())
}
