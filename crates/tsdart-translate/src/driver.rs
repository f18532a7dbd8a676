//! Whole-program translation.

use crate::diagnostics::TranslateError;
use crate::emitter::emit_file;
use std::path::PathBuf;
use tsdart_syntax::{CompilerHost, FsHost, ParseError, Program, parse_source_file};

/// Error from loading, parsing or translating.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Translate(#[from] TranslateError),
}

/// Translate every non-declaration file of `program`, in order, and
/// concatenate the results.
pub fn translate_program(program: &Program) -> Result<String, TranslateError> {
    let mut result = String::new();
    for file in program.translatable_files() {
        let _span = tracing::debug_span!("translate", file = file.file_name()).entered();
        let output = emit_file(file)?;
        tracing::debug!(bytes = output.len(), "translated");
        result.push_str(&output);
    }
    Ok(result)
}

/// Load `paths` from disk and translate them.
pub fn translate_files(paths: &[PathBuf]) -> Result<String, Error> {
    translate_files_with(&FsHost, paths)
}

/// Load `paths` through `host` and translate them.
pub fn translate_files_with(host: &dyn CompilerHost, paths: &[PathBuf]) -> Result<String, Error> {
    let program = Program::load(host, paths)?;
    Ok(translate_program(&program)?)
}

/// Translate a single in-memory source file.
pub fn translate_source(file_name: &str, source: &str) -> Result<String, Error> {
    let tree = parse_source_file(file_name, source)?;
    Ok(emit_file(&tree)?)
}
