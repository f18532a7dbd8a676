//! Input readers - parse source code into a typed [`SyntaxTree`](crate::SyntaxTree).

pub mod typescript;

pub use typescript::{parse_source_file, unescape_string};
