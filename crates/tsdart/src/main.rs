//! tsdart - translate TypeScript source files to Dart.

mod config;
mod logging;

use anyhow::Context;
use clap::Parser;
use config::TsdartConfig;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "tsdart", version, about = "Translate TypeScript to Dart")]
struct Cli {
    /// TypeScript files to translate. Files they reference are included.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = TsdartConfig::load(&cwd);
    logging::init(config.log.filter.as_deref());

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &TsdartConfig) -> anyhow::Result<()> {
    tracing::debug!(files = cli.files.len(), "translating");
    let output = tsdart_translate::translate_files(&cli.files)?;

    match &config.output.path {
        Some(path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("cannot write {}", path.display()))?;
            tracing::debug!(path = %path.display(), "wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .and_then(|()| stdout.flush())
                .context("cannot write to stdout")?;
        }
    }
    Ok(())
}
