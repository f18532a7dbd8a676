//! TypeScript syntax front end for tsdart.
//!
//! Parses TypeScript source into a typed, arena-allocated [`SyntaxTree`] that
//! keeps exact source positions and the original text, so consumers can
//! recover leading comments and report `file:line:column` locations.
//!
//! # Example
//!
//! ```
//! use tsdart_syntax::{NodeKind, parse_source_file};
//!
//! let tree = parse_source_file("a.ts", "var x = 1;").unwrap();
//! let NodeKind::SourceFile { statements, .. } = tree.kind(tree.root()) else {
//!     unreachable!()
//! };
//! assert!(matches!(tree.kind(statements[0]), NodeKind::VariableStatement { .. }));
//! ```

pub mod comments;
mod error;
pub mod input;
pub mod ops;
mod program;
mod tree;

pub use comments::CommentRange;
pub use error::{Location, ParseError};
pub use input::parse_source_file;
pub use ops::{BinaryOperator, PostfixOperator, PrefixOperator};
pub use program::{CompilerHost, FsHost, Program, reference_paths};
pub use tree::{
    HeritageToken, Node, NodeId, NodeKind, Position, Span, SyntaxTree, TreeBuilder, TypeKeyword,
};
