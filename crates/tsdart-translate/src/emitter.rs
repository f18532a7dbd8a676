//! Dart emitter.
//!
//! Walks a [`SyntaxTree`] depth-first and writes Dart tokens into one output
//! buffer. Every token is preceded by a single space; the only other
//! whitespace is the newline after `;` of a variable statement and after
//! comments that ended a line in the source.

use crate::comments::CommentTracker;
use crate::diagnostics::TranslateError;
use crate::tables;
use tsdart_syntax::{HeritageToken, NodeId, NodeKind, SyntaxTree};

type Result<T = ()> = std::result::Result<T, TranslateError>;

/// Translate one file.
pub fn emit_file(tree: &SyntaxTree) -> Result<String> {
    DartEmitter::emit(tree)
}

/// Per-file translation state.
pub struct DartEmitter<'t> {
    tree: &'t SyntaxTree,
    output: String,
    comments: CommentTracker,
}

impl<'t> DartEmitter<'t> {
    pub fn new(tree: &'t SyntaxTree) -> Self {
        Self {
            tree,
            output: String::new(),
            comments: CommentTracker::new(),
        }
    }

    pub fn emit(tree: &'t SyntaxTree) -> Result<String> {
        let mut emitter = Self::new(tree);
        emitter.visit(tree.root())?;
        Ok(emitter.output)
    }

    fn token(&mut self, text: &str) {
        self.output.push(' ');
        self.output.push_str(text);
    }

    fn emit_leading_comments(&mut self, node: NodeId) {
        let tree = self.tree;
        for range in tree.leading_comment_ranges(node) {
            if !self.comments.claim(range.pos) {
                continue;
            }
            self.token(tree.comment_text(&range));
            if range.has_trailing_newline {
                self.output.push('\n');
            }
        }
    }

    fn visit_each(&mut self, nodes: &[NodeId]) -> Result {
        for &node in nodes {
            self.visit(node)?;
        }
        Ok(())
    }

    /// Comma-separated, no trailing comma.
    fn visit_list(&mut self, nodes: &[NodeId]) -> Result {
        for (i, &node) in nodes.iter().enumerate() {
            if i > 0 {
                self.token(",");
            }
            self.visit(node)?;
        }
        Ok(())
    }

    fn visit_opt(&mut self, node: Option<NodeId>) -> Result {
        match node {
            Some(node) => self.visit(node),
            None => Ok(()),
        }
    }

    fn visit_function_like(&mut self, parameters: &[NodeId], body: NodeId) -> Result {
        self.token("(");
        self.visit_list(parameters)?;
        self.token(")");
        self.visit(body)
    }

    fn visit_call(&mut self, expression: NodeId, arguments: &[NodeId]) -> Result {
        self.visit(expression)?;
        self.token("(");
        self.visit_list(arguments)?;
        self.token(")");
        Ok(())
    }

    fn enclosing_class_name(&self, node: NodeId) -> Option<NodeId> {
        self.tree
            .ancestors(node)
            .find_map(|id| match self.tree.kind(id) {
                NodeKind::ClassDeclaration { name, .. } => Some(*name),
                _ => None,
            })
    }

    pub fn visit(&mut self, node: NodeId) -> Result {
        self.emit_leading_comments(node);

        let tree = self.tree;
        match tree.kind(node) {
            NodeKind::SourceFile {
                statements,
                end_of_file,
            } => {
                self.visit_each(statements)?;
                self.visit(*end_of_file)?;
            }
            NodeKind::EndOfFile => {}

            // Statements
            NodeKind::VariableStatement { declaration_list } => {
                self.visit(*declaration_list)?;
                self.token(";\n");
            }
            NodeKind::VariableDeclarationList { declarations } => {
                self.visit_each(declarations)?;
            }
            NodeKind::VariableDeclaration {
                name,
                ty,
                initializer,
            } => {
                match ty {
                    Some(ty) => self.visit(*ty)?,
                    None => self.token("var"),
                }
                self.visit(*name)?;
                if let Some(initializer) = initializer {
                    self.token("=");
                    self.visit(*initializer)?;
                }
            }
            NodeKind::ExpressionStatement { expression } => {
                self.visit(*expression)?;
                self.token(";");
            }
            NodeKind::Block { statements } => {
                self.token("{");
                self.visit_each(statements)?;
                self.token("}");
            }
            NodeKind::If {
                condition,
                then_statement,
                else_statement,
            } => {
                self.token("if (");
                self.visit(*condition)?;
                self.token(")");
                self.visit(*then_statement)?;
                if let Some(else_statement) = else_statement {
                    self.token("else");
                    self.visit(*else_statement)?;
                }
            }
            NodeKind::For {
                initializer,
                condition,
                incrementor,
                body,
            } => {
                self.token("for (");
                self.visit_opt(*initializer)?;
                self.token(";");
                self.visit_opt(*condition)?;
                self.token(";");
                self.visit_opt(*incrementor)?;
                self.token(")");
                self.visit(*body)?;
            }
            // Positional only: Dart's for-in iterates values, not keys.
            NodeKind::ForIn {
                initializer,
                expression,
                body,
            } => {
                self.token("for (");
                self.visit(*initializer)?;
                self.token("in");
                self.visit(*expression)?;
                self.token(")");
                self.visit(*body)?;
            }
            NodeKind::While { condition, body } => {
                self.token("while (");
                self.visit(*condition)?;
                self.token(")");
                self.visit(*body)?;
            }
            NodeKind::Do { body, condition } => {
                self.token("do");
                self.visit(*body)?;
                self.token("while (");
                self.visit(*condition)?;
                self.token(") ;");
            }
            NodeKind::Switch {
                expression,
                clauses,
            } => {
                self.token("switch (");
                self.visit(*expression)?;
                self.token(") {");
                self.visit_each(clauses)?;
                self.token("}");
            }
            NodeKind::CaseClause {
                expression,
                statements,
            } => {
                self.token("case");
                self.visit(*expression)?;
                self.token(":");
                self.visit_each(statements)?;
            }
            NodeKind::DefaultClause { statements } => {
                self.token("default :");
                self.visit_each(statements)?;
            }
            NodeKind::Break => self.token("break ;"),
            NodeKind::Return { expression } => {
                self.token("return");
                self.visit_opt(*expression)?;
                self.token(";");
            }

            // Declarations
            NodeKind::FunctionDeclaration {
                name,
                type_parameters,
                parameters,
                return_type,
                body,
            } => {
                if type_parameters.is_some() {
                    return Err(TranslateError::unsupported(
                        tree,
                        node,
                        "generic functions are unsupported",
                    ));
                }
                self.visit_opt(*return_type)?;
                self.visit(*name)?;
                self.visit_function_like(parameters, *body)?;
            }
            NodeKind::MethodDeclaration {
                name,
                type_parameters,
                parameters,
                return_type,
                body,
            } => {
                if type_parameters.is_some() {
                    return Err(TranslateError::unsupported(
                        tree,
                        node,
                        "generic methods are unsupported",
                    ));
                }
                self.visit_opt(*return_type)?;
                self.visit(*name)?;
                self.visit_function_like(parameters, *body)?;
            }
            NodeKind::ClassDeclaration {
                name,
                type_parameters,
                heritage_clauses,
                members,
            } => {
                self.token("class");
                self.visit(*name)?;
                if let Some(type_parameters) = type_parameters {
                    self.token("<");
                    self.visit_list(type_parameters)?;
                    self.token(">");
                }
                self.visit_each(heritage_clauses)?;
                self.token("{");
                self.visit_each(members)?;
                self.token("}");
            }
            NodeKind::HeritageClause { token, types } => {
                if *token == HeritageToken::Extends && types.len() > 1 {
                    return Err(TranslateError::unsupported(
                        tree,
                        node,
                        "multiple inheritance is unsupported",
                    ));
                }
                self.token(tables::heritage_keyword(*token));
                self.visit_list(types)?;
            }
            NodeKind::Constructor { parameters, body } => {
                let Some(class_name) = self.enclosing_class_name(node) else {
                    return Err(TranslateError::invariant(
                        tree,
                        node,
                        "cannot find outer class node",
                    ));
                };
                self.visit(class_name)?;
                self.visit_function_like(parameters, *body)?;
            }
            NodeKind::PropertyDeclaration {
                name,
                ty,
                initializer,
            } => {
                match ty {
                    Some(ty) => self.visit(*ty)?,
                    None => self.token("var"),
                }
                self.visit(*name)?;
                if let Some(initializer) = initializer {
                    self.token("=");
                    self.visit(*initializer)?;
                }
                self.token(";");
            }
            // Defaulted parameters become Dart optional positional parameters.
            NodeKind::Parameter {
                name,
                ty,
                initializer,
                rest,
            } => {
                if *rest {
                    return Err(TranslateError::unsupported(
                        tree,
                        node,
                        "rest parameters are unsupported",
                    ));
                }
                if initializer.is_some() {
                    self.token("[");
                }
                self.visit_opt(*ty)?;
                self.visit(*name)?;
                if let Some(initializer) = initializer {
                    self.token("=");
                    self.visit(*initializer)?;
                    self.token("]");
                }
            }
            NodeKind::TypeParameter { name, constraint } => {
                self.visit(*name)?;
                if let Some(constraint) = constraint {
                    self.token("extends");
                    self.visit(*constraint)?;
                }
            }

            // Types
            NodeKind::KeywordType(keyword) => self.token(tables::type_keyword(*keyword)),
            NodeKind::TypeReference {
                type_name,
                type_arguments,
            } => {
                self.visit(*type_name)?;
                if let Some(type_arguments) = type_arguments {
                    self.token("<");
                    self.visit_list(type_arguments)?;
                    self.token(">");
                }
            }

            // Expressions
            NodeKind::Identifier { text }
            | NodeKind::NumericLiteral { text }
            | NodeKind::RegularExpressionLiteral { text } => self.token(text),
            NodeKind::StringLiteral { value } => self.token(&tables::dart_string(value)),
            NodeKind::TrueKeyword => self.token("true"),
            NodeKind::FalseKeyword => self.token("false"),
            NodeKind::NullKeyword => self.token("null"),
            NodeKind::ThisKeyword => self.token("this"),
            NodeKind::Parenthesized { expression } => {
                self.token("(");
                self.visit(*expression)?;
                self.token(")");
            }
            NodeKind::PropertyAccess { expression, name } => {
                self.visit(*expression)?;
                self.token(".");
                self.visit(*name)?;
            }
            NodeKind::ElementAccess {
                expression,
                argument,
            } => {
                self.visit(*expression)?;
                self.token("[");
                self.visit(*argument)?;
                self.token("]");
            }
            NodeKind::Call {
                expression,
                arguments,
            } => self.visit_call(*expression, arguments)?,
            NodeKind::New {
                expression,
                arguments,
            } => {
                self.token("new");
                self.visit_call(*expression, arguments)?;
            }
            NodeKind::Binary {
                left,
                operator,
                right,
            } => {
                self.visit(*left)?;
                self.token(operator.as_str());
                self.visit(*right)?;
            }
            NodeKind::PrefixUnary { operator, operand } => {
                self.token(operator.as_str());
                self.visit(*operand)?;
            }
            NodeKind::PostfixUnary { operator, operand } => {
                self.visit(*operand)?;
                self.token(operator.as_str());
            }
            NodeKind::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                self.visit(*condition)?;
                self.token("?");
                self.visit(*when_true)?;
                self.token(":");
                self.visit(*when_false)?;
            }
            NodeKind::Delete { .. } => {
                return Err(TranslateError::unsupported(
                    tree,
                    node,
                    "delete operator is unsupported",
                ));
            }
            NodeKind::Void { .. } => {
                return Err(TranslateError::unsupported(
                    tree,
                    node,
                    "void operator is unsupported",
                ));
            }
            NodeKind::TypeOf { .. } => {
                return Err(TranslateError::unsupported(
                    tree,
                    node,
                    "typeof operator is unsupported",
                ));
            }

            NodeKind::Unsupported { kind } => {
                return Err(TranslateError::unsupported(
                    tree,
                    node,
                    format!("Unsupported node type {}", kind),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;
    use tsdart_syntax::{Position, Span, TreeBuilder};

    struct Builder {
        inner: TreeBuilder,
    }

    impl Builder {
        fn new() -> Self {
            Self {
                inner: TreeBuilder::new(),
            }
        }

        fn push(&mut self, kind: NodeKind) -> NodeId {
            self.inner.push(kind, Span::default(), 0, Position::default())
        }

        fn ident(&mut self, text: &str) -> NodeId {
            self.push(NodeKind::Identifier { text: text.into() })
        }

        fn type_ref(&mut self, text: &str) -> NodeId {
            let type_name = self.ident(text);
            self.push(NodeKind::TypeReference {
                type_name,
                type_arguments: None,
            })
        }

        fn file(mut self, statements: Vec<NodeId>) -> SyntaxTree {
            let end_of_file = self.push(NodeKind::EndOfFile);
            let root = self.push(NodeKind::SourceFile {
                statements,
                end_of_file,
            });
            self.inner.finish("built.ts", "", root)
        }
    }

    #[test]
    fn test_multiple_extends_rejected() {
        let mut b = Builder::new();
        let name = b.ident("A");
        let first = b.type_ref("B");
        let second = b.type_ref("C");
        let clause = b.push(NodeKind::HeritageClause {
            token: HeritageToken::Extends,
            types: vec![first, second],
        });
        let class = b.push(NodeKind::ClassDeclaration {
            name,
            type_parameters: None,
            heritage_clauses: vec![clause],
            members: Vec::new(),
        });
        let tree = b.file(vec![class]);

        let err = emit_file(&tree).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedConstruct);
        assert_eq!(err.to_string(), "built.ts:0:0: multiple inheritance is unsupported");
    }

    #[test]
    fn test_multiple_implements_allowed() {
        let mut b = Builder::new();
        let name = b.ident("A");
        let first = b.type_ref("I");
        let second = b.type_ref("J");
        let clause = b.push(NodeKind::HeritageClause {
            token: HeritageToken::Implements,
            types: vec![first, second],
        });
        let class = b.push(NodeKind::ClassDeclaration {
            name,
            type_parameters: None,
            heritage_clauses: vec![clause],
            members: Vec::new(),
        });
        let tree = b.file(vec![class]);

        assert_eq!(emit_file(&tree).unwrap(), " class A implements I , J { }");
    }

    #[test]
    fn test_constructor_outside_class() {
        let mut b = Builder::new();
        let body = b.push(NodeKind::Block {
            statements: Vec::new(),
        });
        let ctor = b.push(NodeKind::Constructor {
            parameters: Vec::new(),
            body,
        });
        let tree = b.file(vec![ctor]);

        let err = emit_file(&tree).unwrap_err();
        assert_eq!(err.kind, ErrorKind::StructuralInvariantViolation);
        assert_eq!(err.message, "cannot find outer class node");
    }

    #[test]
    fn test_empty_file() {
        let tree = Builder::new().file(Vec::new());
        assert_eq!(emit_file(&tree).unwrap(), "");
    }
}
