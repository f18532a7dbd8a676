//! Multi-file programs: root files plus every file they reference.
//!
//! `/// <reference path="..."/>` directives in a file's header are followed
//! depth-first, so a referenced file always precedes the file referencing it.
//! Declaration files (`.d.ts`) are tracked but never parsed.

use crate::error::ParseError;
use crate::input::parse_source_file;
use crate::tree::SyntaxTree;
use regex::Regex;
use std::collections::HashSet;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

/// File access used while loading a program.
pub trait CompilerHost {
    fn read_file(&self, path: &Path) -> io::Result<String>;
}

/// Reads files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsHost;

impl CompilerHost for FsHost {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// The parsed source files of a program, in translation order.
#[derive(Debug, Default)]
pub struct Program {
    files: Vec<SyntaxTree>,
    declaration_files: Vec<PathBuf>,
}

impl Program {
    /// Load `roots` and everything they reference.
    ///
    /// A root that cannot be read is an error. A referenced file that cannot
    /// be read is skipped with a warning.
    pub fn load(host: &dyn CompilerHost, roots: &[PathBuf]) -> Result<Self, ParseError> {
        let mut loader = Loader {
            host,
            seen: HashSet::new(),
            program: Program::default(),
        };
        for root in roots {
            loader.visit(&normalize_path(root), true)?;
        }
        tracing::debug!(
            files = loader.program.files.len(),
            declarations = loader.program.declaration_files.len(),
            "program loaded"
        );
        Ok(loader.program)
    }

    /// Parsed non-declaration files; referenced files come first.
    pub fn translatable_files(&self) -> &[SyntaxTree] {
        &self.files
    }

    pub fn declaration_files(&self) -> &[PathBuf] {
        &self.declaration_files
    }
}

struct Loader<'h> {
    host: &'h dyn CompilerHost,
    seen: HashSet<PathBuf>,
    program: Program,
}

impl Loader<'_> {
    fn visit(&mut self, path: &Path, is_root: bool) -> Result<(), ParseError> {
        if !self.seen.insert(path.to_path_buf()) {
            return Ok(());
        }
        if is_declaration_file(path) {
            tracing::debug!(path = %path.display(), "skipping declaration file");
            self.program.declaration_files.push(path.to_path_buf());
            return Ok(());
        }

        let text = match self.host.read_file(path) {
            Ok(text) => text,
            Err(source) if is_root => {
                return Err(ParseError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), "cannot read referenced file: {}", err);
                return Ok(());
            }
        };

        let dir = path.parent().unwrap_or(Path::new(""));
        for reference in reference_paths(&text) {
            tracing::trace!(from = %path.display(), reference, "reference directive");
            self.visit(&normalize_path(&dir.join(reference)), false)?;
        }

        tracing::debug!(path = %path.display(), "parsing");
        let tree = parse_source_file(&path.display().to_string(), &text)?;
        self.program.files.push(tree);
        Ok(())
    }
}

/// Any path containing `.d.ts`, not only ones ending in it.
fn is_declaration_file(path: &Path) -> bool {
    path.to_string_lossy().contains(".d.ts")
}

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^///\s*<reference\s+path\s*=\s*["']([^"']+)["']"#)
            .expect("reference pattern is valid")
    })
}

/// Paths named by reference directives in the file header.
///
/// Only the leading run of blank and `//` comment lines is considered.
pub fn reference_paths(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .take_while(|line| line.is_empty() || line.starts_with("//") || line.starts_with("#!"))
        .filter_map(|line| reference_pattern().captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Resolve `.` and `..` lexically so the same file is only loaded once.
fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryHost {
        files: HashMap<PathBuf, String>,
    }

    impl MemoryHost {
        fn with(mut self, path: &str, text: &str) -> Self {
            self.files.insert(PathBuf::from(path), text.to_string());
            self
        }
    }

    impl CompilerHost for MemoryHost {
        fn read_file(&self, path: &Path) -> io::Result<String> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }
    }

    fn names(program: &Program) -> Vec<&str> {
        program.translatable_files().iter().map(|f| f.file_name()).collect()
    }

    #[test]
    fn test_reference_paths_in_header_only() {
        let text = "/// <reference path=\"a.ts\" />\n// note\n/// <reference path='b.ts'/>\nvar x;\n/// <reference path=\"c.ts\" />\n";
        assert_eq!(reference_paths(text), vec!["a.ts", "b.ts"]);
    }

    #[test]
    fn test_referenced_files_come_first() {
        let host = MemoryHost::default()
            .with("src/main.ts", "/// <reference path=\"lib/util.ts\" />\nvar a;\n")
            .with("src/lib/util.ts", "/// <reference path=\"../base.ts\" />\nvar b;\n")
            .with("src/base.ts", "var c;\n");
        let program = Program::load(&host, &[PathBuf::from("src/main.ts")]).unwrap();
        assert_eq!(
            names(&program),
            vec!["src/base.ts", "src/lib/util.ts", "src/main.ts"]
        );
    }

    #[test]
    fn test_each_file_loaded_once() {
        let host = MemoryHost::default()
            .with("a.ts", "/// <reference path=\"c.ts\" />\nvar a;\n")
            .with("b.ts", "/// <reference path=\"./c.ts\" />\nvar b;\n")
            .with("c.ts", "var c;\n");
        let roots = [PathBuf::from("a.ts"), PathBuf::from("b.ts"), PathBuf::from("a.ts")];
        let program = Program::load(&host, &roots).unwrap();
        assert_eq!(names(&program), vec!["c.ts", "a.ts", "b.ts"]);
    }

    #[test]
    fn test_declaration_files_not_parsed() {
        let host = MemoryHost::default()
            .with("main.ts", "/// <reference path=\"lib.d.ts\" />\nvar a;\n");
        let program = Program::load(&host, &[PathBuf::from("main.ts")]).unwrap();
        assert_eq!(names(&program), vec!["main.ts"]);
        assert_eq!(program.declaration_files(), &[PathBuf::from("lib.d.ts")]);
    }

    #[test]
    fn test_declaration_marker_anywhere_in_path() {
        let host = MemoryHost::default()
            .with("main.ts", "/// <reference path=\"gen.d.ts.bak\" />\nvar a;\n")
            .with("gen.d.ts.bak", "var b;\n");
        let program = Program::load(&host, &[PathBuf::from("main.ts")]).unwrap();
        assert_eq!(names(&program), vec!["main.ts"]);
        assert_eq!(program.declaration_files(), &[PathBuf::from("gen.d.ts.bak")]);
    }

    #[test]
    fn test_missing_root_is_error() {
        let host = MemoryHost::default();
        let err = Program::load(&host, &[PathBuf::from("gone.ts")]).unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
        assert!(err.to_string().starts_with("cannot read gone.ts"));
    }

    #[test]
    fn test_missing_reference_is_skipped() {
        let host = MemoryHost::default()
            .with("main.ts", "/// <reference path=\"gone.ts\" />\nvar a;\n");
        let program = Program::load(&host, &[PathBuf::from("main.ts")]).unwrap();
        assert_eq!(names(&program), vec!["main.ts"]);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("a/./b/../c.ts")), PathBuf::from("a/c.ts"));
        assert_eq!(normalize_path(Path::new("../x.ts")), PathBuf::from("../x.ts"));
    }
}
