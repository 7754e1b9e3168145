//! Command-line interface for the weft translator.

use clap::Parser;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;
use weft_alloy::render_model;
use weft_syntax::parse;
use weft_translate::translate_program;

/// CLI error with source context for pretty printing.
#[derive(Debug, Error, Diagnostic)]
enum CliError {
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("parse error: {message}")]
    #[diagnostic(code(weft::parse_error))]
    Parse {
        message: String,
        #[source_code]
        src: NamedSource<Arc<String>>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("translation error: {message}")]
    #[diagnostic(code(weft::translate_error))]
    Translate { message: String },

    #[error("failed to write {path}: {message}")]
    Output { path: String, message: String },
}

impl CliError {
    fn from_parse_error(e: weft_syntax::ParseError, source: Arc<String>, filename: &str) -> Self {
        let span = e.span();
        CliError::Parse {
            message: e.to_string(),
            src: NamedSource::new(filename, source),
            span: (span.start, span.len().max(1)).into(),
        }
    }
}

#[derive(Parser)]
#[command(name = "weft", version)]
#[command(
    about = "Translate restricted imperative sources into an Alloy transition-system model",
    long_about = None
)]
struct Cli {
    /// Input source files
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Write the model to a file instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr; stdout carries only the rendered model.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let mut programs = Vec::new();
    for path in &cli.files {
        let filename = path.display().to_string();
        let source = Arc::new(fs::read_to_string(path).map_err(|e| CliError::Io {
            path: filename.clone(),
            message: e.to_string(),
        })?);

        let program = parse(&source)
            .map_err(|e| CliError::from_parse_error(e, source.clone(), &filename))?;
        programs.push(program);
    }

    info!(files = programs.len(), "translating");

    let model = translate_program(&programs).map_err(|e| CliError::Translate {
        message: e.to_string(),
    })?;

    let text = render_model(&model);
    match &cli.output {
        Some(path) => fs::write(path, text).map_err(|e| CliError::Output {
            path: path.display().to_string(),
            message: e.to_string(),
        })?,
        None => print!("{}", text),
    }

    Ok(())
}
