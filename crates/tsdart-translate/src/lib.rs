//! TypeScript to Dart translation.
//!
//! The translator walks a [`tsdart_syntax::SyntaxTree`] and emits Dart tokens,
//! carrying leading comments over and failing on the first construct Dart
//! cannot express.
//!
//! # Example
//!
//! ```
//! let dart = tsdart_translate::translate_source("a.ts", "var x = 1;").unwrap();
//! assert_eq!(dart.trim(), "var x = 1 ;");
//! ```

pub mod comments;
mod diagnostics;
mod driver;
mod emitter;
pub mod tables;

pub use comments::CommentTracker;
pub use diagnostics::{ErrorKind, TranslateError};
pub use driver::{Error, translate_files, translate_files_with, translate_program, translate_source};
pub use emitter::{DartEmitter, emit_file};
