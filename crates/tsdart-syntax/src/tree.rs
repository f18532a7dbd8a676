//! Arena-allocated, typed syntax tree.
//!
//! Nodes are created once by a front end (see [`crate::input`]) and never
//! mutated afterwards. Children are referenced by [`NodeId`]; each node also
//! records its parent so consumers can walk upwards without owning anything.

use crate::comments::{CommentRange, leading_comment_ranges};
use crate::error::Location;
use crate::ops::{BinaryOperator, PostfixOperator, PrefixOperator};

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Byte range of a node's own text, excluding leading trivia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

/// 0-based line and column of a node's first token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Predefined type keywords with a typed representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKeyword {
    Number,
    String,
    Boolean,
    Void,
    Any,
}

impl TypeKeyword {
    pub fn from_keyword(text: &str) -> Option<Self> {
        match text {
            "number" => Some(Self::Number),
            "string" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            "void" => Some(Self::Void),
            "any" => Some(Self::Any),
            _ => None,
        }
    }
}

/// Token that opens a heritage clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeritageToken {
    Extends,
    Implements,
}

/// Every node kind the front end can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    SourceFile {
        statements: Vec<NodeId>,
        end_of_file: NodeId,
    },
    /// Zero-width marker at the end of a file; carries trailing file comments.
    EndOfFile,

    // Statements
    VariableStatement {
        declaration_list: NodeId,
    },
    VariableDeclarationList {
        declarations: Vec<NodeId>,
    },
    VariableDeclaration {
        name: NodeId,
        ty: Option<NodeId>,
        initializer: Option<NodeId>,
    },
    ExpressionStatement {
        expression: NodeId,
    },
    Block {
        statements: Vec<NodeId>,
    },
    If {
        condition: NodeId,
        then_statement: NodeId,
        else_statement: Option<NodeId>,
    },
    For {
        initializer: Option<NodeId>,
        condition: Option<NodeId>,
        incrementor: Option<NodeId>,
        body: NodeId,
    },
    ForIn {
        initializer: NodeId,
        expression: NodeId,
        body: NodeId,
    },
    While {
        condition: NodeId,
        body: NodeId,
    },
    Do {
        body: NodeId,
        condition: NodeId,
    },
    Switch {
        expression: NodeId,
        clauses: Vec<NodeId>,
    },
    CaseClause {
        expression: NodeId,
        statements: Vec<NodeId>,
    },
    DefaultClause {
        statements: Vec<NodeId>,
    },
    Break,
    Return {
        expression: Option<NodeId>,
    },

    // Declarations
    FunctionDeclaration {
        name: NodeId,
        type_parameters: Option<Vec<NodeId>>,
        parameters: Vec<NodeId>,
        return_type: Option<NodeId>,
        body: NodeId,
    },
    ClassDeclaration {
        name: NodeId,
        type_parameters: Option<Vec<NodeId>>,
        heritage_clauses: Vec<NodeId>,
        members: Vec<NodeId>,
    },
    HeritageClause {
        token: HeritageToken,
        types: Vec<NodeId>,
    },
    Constructor {
        parameters: Vec<NodeId>,
        body: NodeId,
    },
    MethodDeclaration {
        name: NodeId,
        type_parameters: Option<Vec<NodeId>>,
        parameters: Vec<NodeId>,
        return_type: Option<NodeId>,
        body: NodeId,
    },
    PropertyDeclaration {
        name: NodeId,
        ty: Option<NodeId>,
        initializer: Option<NodeId>,
    },
    Parameter {
        name: NodeId,
        ty: Option<NodeId>,
        initializer: Option<NodeId>,
        rest: bool,
    },
    TypeParameter {
        name: NodeId,
        constraint: Option<NodeId>,
    },

    // Types
    KeywordType(TypeKeyword),
    TypeReference {
        type_name: NodeId,
        type_arguments: Option<Vec<NodeId>>,
    },

    // Expressions
    Identifier {
        text: String,
    },
    NumericLiteral {
        text: String,
    },
    /// `value` is the decoded literal, escapes already resolved.
    StringLiteral {
        value: String,
    },
    RegularExpressionLiteral {
        text: String,
    },
    TrueKeyword,
    FalseKeyword,
    NullKeyword,
    ThisKeyword,
    Parenthesized {
        expression: NodeId,
    },
    PropertyAccess {
        expression: NodeId,
        name: NodeId,
    },
    ElementAccess {
        expression: NodeId,
        argument: NodeId,
    },
    Call {
        expression: NodeId,
        arguments: Vec<NodeId>,
    },
    New {
        expression: NodeId,
        arguments: Vec<NodeId>,
    },
    Binary {
        left: NodeId,
        operator: BinaryOperator,
        right: NodeId,
    },
    PrefixUnary {
        operator: PrefixOperator,
        operand: NodeId,
    },
    PostfixUnary {
        operator: PostfixOperator,
        operand: NodeId,
    },
    Conditional {
        condition: NodeId,
        when_true: NodeId,
        when_false: NodeId,
    },
    Delete {
        expression: NodeId,
    },
    Void {
        expression: NodeId,
    },
    TypeOf {
        expression: NodeId,
    },

    /// Source construct with no typed representation. `kind` names it.
    Unsupported {
        kind: String,
    },
}

impl NodeKind {
    /// Short kind name; for unsupported nodes, the source construct's name.
    pub fn name(&self) -> &str {
        match self {
            NodeKind::SourceFile { .. } => "SourceFile",
            NodeKind::EndOfFile => "EndOfFile",
            NodeKind::VariableStatement { .. } => "VariableStatement",
            NodeKind::VariableDeclarationList { .. } => "VariableDeclarationList",
            NodeKind::VariableDeclaration { .. } => "VariableDeclaration",
            NodeKind::ExpressionStatement { .. } => "ExpressionStatement",
            NodeKind::Block { .. } => "Block",
            NodeKind::If { .. } => "IfStatement",
            NodeKind::For { .. } => "ForStatement",
            NodeKind::ForIn { .. } => "ForInStatement",
            NodeKind::While { .. } => "WhileStatement",
            NodeKind::Do { .. } => "DoStatement",
            NodeKind::Switch { .. } => "SwitchStatement",
            NodeKind::CaseClause { .. } => "CaseClause",
            NodeKind::DefaultClause { .. } => "DefaultClause",
            NodeKind::Break => "BreakStatement",
            NodeKind::Return { .. } => "ReturnStatement",
            NodeKind::FunctionDeclaration { .. } => "FunctionDeclaration",
            NodeKind::ClassDeclaration { .. } => "ClassDeclaration",
            NodeKind::HeritageClause { .. } => "HeritageClause",
            NodeKind::Constructor { .. } => "Constructor",
            NodeKind::MethodDeclaration { .. } => "MethodDeclaration",
            NodeKind::PropertyDeclaration { .. } => "PropertyDeclaration",
            NodeKind::Parameter { .. } => "Parameter",
            NodeKind::TypeParameter { .. } => "TypeParameter",
            NodeKind::KeywordType(_) => "KeywordType",
            NodeKind::TypeReference { .. } => "TypeReference",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::NumericLiteral { .. } => "NumericLiteral",
            NodeKind::StringLiteral { .. } => "StringLiteral",
            NodeKind::RegularExpressionLiteral { .. } => "RegularExpressionLiteral",
            NodeKind::TrueKeyword => "TrueKeyword",
            NodeKind::FalseKeyword => "FalseKeyword",
            NodeKind::NullKeyword => "NullKeyword",
            NodeKind::ThisKeyword => "ThisKeyword",
            NodeKind::Parenthesized { .. } => "ParenthesizedExpression",
            NodeKind::PropertyAccess { .. } => "PropertyAccessExpression",
            NodeKind::ElementAccess { .. } => "ElementAccessExpression",
            NodeKind::Call { .. } => "CallExpression",
            NodeKind::New { .. } => "NewExpression",
            NodeKind::Binary { .. } => "BinaryExpression",
            NodeKind::PrefixUnary { .. } => "PrefixUnaryExpression",
            NodeKind::PostfixUnary { .. } => "PostfixUnaryExpression",
            NodeKind::Conditional { .. } => "ConditionalExpression",
            NodeKind::Delete { .. } => "DeleteExpression",
            NodeKind::Void { .. } => "VoidExpression",
            NodeKind::TypeOf { .. } => "TypeOfExpression",
            NodeKind::Unsupported { kind } => kind.as_str(),
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<NodeId> {
        fn opt(id: &Option<NodeId>) -> impl Iterator<Item = NodeId> + '_ {
            id.iter().copied()
        }
        fn opt_list(list: &Option<Vec<NodeId>>) -> impl Iterator<Item = NodeId> + '_ {
            list.iter().flatten().copied()
        }

        match self {
            NodeKind::SourceFile {
                statements,
                end_of_file,
            } => statements.iter().copied().chain([*end_of_file]).collect(),
            NodeKind::VariableStatement { declaration_list } => vec![*declaration_list],
            NodeKind::VariableDeclarationList { declarations } => declarations.clone(),
            NodeKind::VariableDeclaration {
                name,
                ty,
                initializer,
            }
            | NodeKind::Parameter {
                name,
                ty,
                initializer,
                ..
            }
            | NodeKind::PropertyDeclaration {
                name,
                ty,
                initializer,
            } => std::iter::once(*name)
                .chain(opt(ty))
                .chain(opt(initializer))
                .collect(),
            NodeKind::ExpressionStatement { expression }
            | NodeKind::Parenthesized { expression }
            | NodeKind::Delete { expression }
            | NodeKind::Void { expression }
            | NodeKind::TypeOf { expression } => vec![*expression],
            NodeKind::Block { statements } | NodeKind::DefaultClause { statements } => {
                statements.clone()
            }
            NodeKind::If {
                condition,
                then_statement,
                else_statement,
            } => [*condition, *then_statement]
                .into_iter()
                .chain(opt(else_statement))
                .collect(),
            NodeKind::For {
                initializer,
                condition,
                incrementor,
                body,
            } => opt(initializer)
                .chain(opt(condition))
                .chain(opt(incrementor))
                .chain([*body])
                .collect(),
            NodeKind::ForIn {
                initializer,
                expression,
                body,
            } => vec![*initializer, *expression, *body],
            NodeKind::While { condition, body } => vec![*condition, *body],
            NodeKind::Do { body, condition } => vec![*body, *condition],
            NodeKind::Switch {
                expression,
                clauses,
            } => std::iter::once(*expression)
                .chain(clauses.iter().copied())
                .collect(),
            NodeKind::CaseClause {
                expression,
                statements,
            } => std::iter::once(*expression)
                .chain(statements.iter().copied())
                .collect(),
            NodeKind::Return { expression } => opt(expression).collect(),
            NodeKind::FunctionDeclaration {
                name,
                type_parameters,
                parameters,
                return_type,
                body,
            }
            | NodeKind::MethodDeclaration {
                name,
                type_parameters,
                parameters,
                return_type,
                body,
            } => std::iter::once(*name)
                .chain(opt_list(type_parameters))
                .chain(parameters.iter().copied())
                .chain(opt(return_type))
                .chain([*body])
                .collect(),
            NodeKind::ClassDeclaration {
                name,
                type_parameters,
                heritage_clauses,
                members,
            } => std::iter::once(*name)
                .chain(opt_list(type_parameters))
                .chain(heritage_clauses.iter().copied())
                .chain(members.iter().copied())
                .collect(),
            NodeKind::HeritageClause { types, .. } => types.clone(),
            NodeKind::Constructor { parameters, body } => parameters
                .iter()
                .copied()
                .chain([*body])
                .collect(),
            NodeKind::TypeParameter { name, constraint } => {
                std::iter::once(*name).chain(opt(constraint)).collect()
            }
            NodeKind::TypeReference {
                type_name,
                type_arguments,
            } => std::iter::once(*type_name)
                .chain(opt_list(type_arguments))
                .collect(),
            NodeKind::PropertyAccess { expression, name } => vec![*expression, *name],
            NodeKind::ElementAccess {
                expression,
                argument,
            } => vec![*expression, *argument],
            NodeKind::Call {
                expression,
                arguments,
            }
            | NodeKind::New {
                expression,
                arguments,
            } => std::iter::once(*expression)
                .chain(arguments.iter().copied())
                .collect(),
            NodeKind::Binary { left, right, .. } => vec![*left, *right],
            NodeKind::PrefixUnary { operand, .. } | NodeKind::PostfixUnary { operand, .. } => {
                vec![*operand]
            }
            NodeKind::Conditional {
                condition,
                when_true,
                when_false,
            } => vec![*condition, *when_true, *when_false],
            NodeKind::EndOfFile
            | NodeKind::Break
            | NodeKind::KeywordType(_)
            | NodeKind::Identifier { .. }
            | NodeKind::NumericLiteral { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::RegularExpressionLiteral { .. }
            | NodeKind::TrueKeyword
            | NodeKind::FalseKeyword
            | NodeKind::NullKeyword
            | NodeKind::ThisKeyword
            | NodeKind::Unsupported { .. } => Vec::new(),
        }
    }
}

/// One node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    /// End of the previous non-comment token; leading trivia sits between
    /// `full_start` and `span.start`.
    pub full_start: u32,
    pub position: Position,
    pub parent: Option<NodeId>,
}

/// A parsed source file.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    file_name: String,
    text: String,
    nodes: Vec<Node>,
    root: NodeId,
}

impl SyntaxTree {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Parent, grandparent, ... up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&parent| self.parent(parent))
    }

    /// Comments between the node's full start and its first token.
    pub fn leading_comment_ranges(&self, id: NodeId) -> Vec<CommentRange> {
        leading_comment_ranges(&self.text, self.node(id).full_start as usize)
    }

    pub fn comment_text(&self, range: &CommentRange) -> &str {
        &self.text[range.pos as usize..range.end as usize]
    }

    pub fn location(&self, id: NodeId) -> Location {
        let position = self.node(id).position;
        Location {
            file: self.file_name.clone(),
            line: position.line,
            column: position.column,
        }
    }
}

/// Appends nodes bottom-up and links parents as each node is added.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node whose children have already been added.
    pub fn push(
        &mut self,
        kind: NodeKind,
        span: Span,
        full_start: u32,
        position: Position,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in kind.children() {
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes.push(Node {
            kind,
            span,
            full_start,
            position,
            parent: None,
        });
        id
    }

    pub fn finish(
        self,
        file_name: impl Into<String>,
        text: impl Into<String>,
        root: NodeId,
    ) -> SyntaxTree {
        SyntaxTree {
            file_name: file_name.into(),
            text: text.into(),
            nodes: self.nodes,
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(builder: &mut TreeBuilder, kind: NodeKind) -> NodeId {
        builder.push(kind, Span::default(), 0, Position::default())
    }

    #[test]
    fn test_builder_links_parents() {
        let mut builder = TreeBuilder::new();
        let left = leaf(&mut builder, NodeKind::Identifier { text: "a".into() });
        let right = leaf(&mut builder, NodeKind::NumericLiteral { text: "1".into() });
        let binary = leaf(
            &mut builder,
            NodeKind::Binary {
                left,
                operator: BinaryOperator::Plus,
                right,
            },
        );
        let eof = leaf(&mut builder, NodeKind::EndOfFile);
        let statement = leaf(&mut builder, NodeKind::ExpressionStatement { expression: binary });
        let root = leaf(
            &mut builder,
            NodeKind::SourceFile {
                statements: vec![statement],
                end_of_file: eof,
            },
        );
        let tree = builder.finish("a.ts", "a + 1;", root);

        assert_eq!(tree.parent(left), Some(binary));
        assert_eq!(tree.parent(binary), Some(statement));
        assert_eq!(tree.parent(root), None);
        assert_eq!(
            tree.ancestors(left).collect::<Vec<_>>(),
            vec![binary, statement, root]
        );
    }

    #[test]
    fn test_children_in_source_order() {
        let kind = NodeKind::For {
            initializer: None,
            condition: Some(NodeId(3)),
            incrementor: Some(NodeId(4)),
            body: NodeId(5),
        };
        assert_eq!(kind.children(), vec![NodeId(3), NodeId(4), NodeId(5)]);
    }

    #[test]
    fn test_location_uses_file_name() {
        let mut builder = TreeBuilder::new();
        let root = builder.push(
            NodeKind::EndOfFile,
            Span::new(4, 4),
            0,
            Position { line: 2, column: 7 },
        );
        let tree = builder.finish("dir/x.ts", "    ", root);
        assert_eq!(tree.location(root).to_string(), "dir/x.ts:2:7");
    }
}
