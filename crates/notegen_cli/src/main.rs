//! Command-line entry point.
//!
//! # Responsibility
//! - Translate arguments into `CreateOptions` and run `create_note`.
//! - Print the created path on stdout and errors on stderr.

use clap::{Parser, Subcommand};
use notegen_core::config::templates_dir;
use notegen_core::{
    create_note, default_log_level, init_logging, load_notebook_config_or_default, CreateOptions,
    FsTemplateLoader,
};
use std::error::Error;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "notegen")]
#[command(about = "Create uniquely named notes from templates", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Notebook root directory
    #[arg(short, long, global = true, default_value = ".")]
    notebook: PathBuf,

    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new note
    New {
        /// Directory relative to the notebook root
        #[arg(default_value = ".")]
        dir: String,

        /// Title of the note
        #[arg(short, long)]
        title: Option<String>,

        /// Initial content injected into the body template
        #[arg(short, long, conflicts_with = "stdin")]
        content: Option<String>,

        /// Read initial content from stdin
        #[arg(long)]
        stdin: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("notegen: {err}");
            return ExitCode::FAILURE;
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("notegen: {}", error_chain(err.as_ref()));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::New {
            dir,
            title,
            content,
            stdin,
        } => {
            let config = load_notebook_config_or_default(&cli.notebook)?;
            let directory = config.directory(&cli.notebook, &dir)?;

            let content = if stdin {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                Some(buffer)
            } else {
                content
            };

            let options = CreateOptions {
                dir: directory,
                title,
                content,
            };
            let loader = FsTemplateLoader::new(templates_dir(&cli.notebook));
            let path = create_note(&options, &loader)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

/// Joins an error with its sources: `outer: inner: root`.
fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    message
}
