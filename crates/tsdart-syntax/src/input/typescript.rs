//! Tree-sitter based TypeScript reader.
//!
//! Parses with the arborium TypeScript grammar and lowers the concrete syntax
//! tree into typed nodes. Anything without a typed representation becomes a
//! [`NodeKind::Unsupported`] node so the translator can report it with a
//! precise location.

use crate::error::{Location, ParseError};
use crate::ops::{BinaryOperator, PostfixOperator, PrefixOperator};
use crate::tree::{
    HeritageToken, NodeId, NodeKind, Position, Span, SyntaxTree, TreeBuilder, TypeKeyword,
};
use tree_sitter::{Node, Parser};

/// Parse TypeScript source into a typed syntax tree.
pub fn parse_source_file(file_name: &str, source: &str) -> Result<SyntaxTree, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_typescript::language().into())
        .map_err(|err| ParseError::Language(err.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::Language("parser produced no tree".into()))?;

    let root = tree.root_node();
    let mut ctx = LowerContext::new(file_name, source, root);

    if let Some(bad) = first_error(root) {
        return Err(ctx.syntax_error(bad));
    }

    let root_id = ctx.lower_source_file(root)?;
    Ok(ctx.builder.finish(file_name, source, root_id))
}

struct LowerContext<'a> {
    file_name: &'a str,
    source: &'a str,
    /// End offsets of every non-comment token, ascending.
    token_ends: Vec<u32>,
    builder: TreeBuilder,
}

impl<'a> LowerContext<'a> {
    fn new(file_name: &'a str, source: &'a str, root: Node) -> Self {
        Self {
            file_name,
            source,
            token_ends: collect_token_ends(root),
            builder: TreeBuilder::new(),
        }
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn full_start(&self, start: u32) -> u32 {
        let idx = self.token_ends.partition_point(|&end| end <= start);
        if idx == 0 { 0 } else { self.token_ends[idx - 1] }
    }

    fn location(&self, node: Node) -> Location {
        let position = position_of(node);
        Location {
            file: self.file_name.to_string(),
            line: position.line,
            column: position.column,
        }
    }

    fn syntax_error(&self, node: Node) -> ParseError {
        let message = if node.is_missing() {
            format!("missing '{}'", node.kind())
        } else {
            let text: String = self.node_text(node).chars().take(40).collect();
            format!("unexpected '{}'", text)
        };
        ParseError::Syntax {
            location: self.location(node),
            message,
        }
    }

    fn malformed(&self, node: Node, what: &str) -> ParseError {
        ParseError::Syntax {
            location: self.location(node),
            message: format!("{} is missing {}", node.kind(), what),
        }
    }

    fn field<'t>(&self, node: Node<'t>, name: &str) -> Result<Node<'t>, ParseError> {
        node.child_by_field_name(name)
            .ok_or_else(|| self.malformed(node, name))
    }

    fn first_named<'t>(&self, node: Node<'t>) -> Result<Node<'t>, ParseError> {
        named_children(node)
            .into_iter()
            .next()
            .ok_or_else(|| self.malformed(node, "a child"))
    }

    fn unwrap_parens<'t>(&self, node: Node<'t>) -> Result<Node<'t>, ParseError> {
        if node.kind() == "parenthesized_expression" {
            self.first_named(node)
        } else {
            Ok(node)
        }
    }

    fn push(&mut self, node: Node, kind: NodeKind) -> NodeId {
        let span = Span::new(node.start_byte() as u32, node.end_byte() as u32);
        self.push_at(span, position_of(node), kind)
    }

    fn push_at(&mut self, span: Span, position: Position, kind: NodeKind) -> NodeId {
        let full_start = self.full_start(span.start);
        self.builder.push(kind, span, full_start, position)
    }

    fn unsupported(&mut self, node: Node) -> NodeId {
        self.unsupported_as(node, node.kind())
    }

    fn unsupported_as(&mut self, node: Node, kind: &str) -> NodeId {
        self.push(
            node,
            NodeKind::Unsupported {
                kind: kind.to_string(),
            },
        )
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn lower_source_file(&mut self, root: Node) -> Result<NodeId, ParseError> {
        let mut statements = Vec::new();
        for child in named_children(root) {
            if child.kind() == "hash_bang_line" {
                continue;
            }
            statements.push(self.lower_statement(child)?);
        }

        let end = self.source.len() as u32;
        let end_of_file = self.push_at(
            Span::new(end, end),
            position_at(self.source, end as usize),
            NodeKind::EndOfFile,
        );
        Ok(self.push_at(
            Span::new(0, end),
            Position::default(),
            NodeKind::SourceFile {
                statements,
                end_of_file,
            },
        ))
    }

    fn lower_statement(&mut self, node: Node) -> Result<NodeId, ParseError> {
        match node.kind() {
            "variable_declaration" | "lexical_declaration" => {
                let declaration_list = self.lower_declaration_list(node)?;
                Ok(self.push(node, NodeKind::VariableStatement { declaration_list }))
            }
            "expression_statement" => {
                let expression = self.lower_expression(self.first_named(node)?)?;
                Ok(self.push(node, NodeKind::ExpressionStatement { expression }))
            }
            "statement_block" => self.lower_block(node),
            "if_statement" => self.lower_if(node),
            "for_statement" => self.lower_for(node),
            "for_in_statement" => self.lower_for_in(node),
            "while_statement" => {
                let condition = self.unwrap_parens(self.field(node, "condition")?)?;
                let condition = self.lower_expression(condition)?;
                let body = self.lower_statement(self.field(node, "body")?)?;
                Ok(self.push(node, NodeKind::While { condition, body }))
            }
            "do_statement" => {
                let body = self.lower_statement(self.field(node, "body")?)?;
                let condition = self.unwrap_parens(self.field(node, "condition")?)?;
                let condition = self.lower_expression(condition)?;
                Ok(self.push(node, NodeKind::Do { body, condition }))
            }
            "switch_statement" => self.lower_switch(node),
            "break_statement" => {
                if node.child_by_field_name("label").is_some() {
                    Ok(self.unsupported_as(node, "labeled break_statement"))
                } else {
                    Ok(self.push(node, NodeKind::Break))
                }
            }
            "return_statement" => {
                let expression = match named_children(node).into_iter().next() {
                    Some(value) => Some(self.lower_expression(value)?),
                    None => None,
                };
                Ok(self.push(node, NodeKind::Return { expression }))
            }
            "function_declaration" => self.lower_function(node, node),
            "class_declaration" => self.lower_class(node, node),
            "export_statement" => self.lower_export(node),
            _ => Ok(self.unsupported(node)),
        }
    }

    /// `export function` / `export class` keep their declaration; the
    /// modifier itself has no typed representation and is dropped.
    fn lower_export(&mut self, node: Node) -> Result<NodeId, ParseError> {
        let is_default = anonymous_children(node)
            .iter()
            .any(|child| self.node_text(*child) == "default");
        match node.child_by_field_name("declaration") {
            Some(decl) if !is_default && decl.kind() == "function_declaration" => {
                self.lower_function(decl, node)
            }
            Some(decl) if !is_default && decl.kind() == "class_declaration" => {
                self.lower_class(decl, node)
            }
            _ => Ok(self.unsupported(node)),
        }
    }

    fn lower_declaration_list(&mut self, node: Node) -> Result<NodeId, ParseError> {
        let mut declarations = Vec::new();
        for child in named_children(node) {
            if child.kind() == "variable_declarator" {
                declarations.push(self.lower_variable_declarator(child)?);
            }
        }
        Ok(self.push(node, NodeKind::VariableDeclarationList { declarations }))
    }

    fn lower_variable_declarator(&mut self, node: Node) -> Result<NodeId, ParseError> {
        let name = self.lower_binding_name(self.field(node, "name")?);
        let ty = self.lower_optional_type(node.child_by_field_name("type"))?;
        let initializer = self.lower_optional_expression(node.child_by_field_name("value"))?;
        Ok(self.push(
            node,
            NodeKind::VariableDeclaration {
                name,
                ty,
                initializer,
            },
        ))
    }

    fn lower_block(&mut self, node: Node) -> Result<NodeId, ParseError> {
        let mut statements = Vec::new();
        for child in named_children(node) {
            statements.push(self.lower_statement(child)?);
        }
        Ok(self.push(node, NodeKind::Block { statements }))
    }

    fn lower_if(&mut self, node: Node) -> Result<NodeId, ParseError> {
        let condition = self.unwrap_parens(self.field(node, "condition")?)?;
        let condition = self.lower_expression(condition)?;
        let then_statement = self.lower_statement(self.field(node, "consequence")?)?;
        let else_statement = match node.child_by_field_name("alternative") {
            Some(clause) => Some(self.lower_statement(self.first_named(clause)?)?),
            None => None,
        };
        Ok(self.push(
            node,
            NodeKind::If {
                condition,
                then_statement,
                else_statement,
            },
        ))
    }

    fn lower_for(&mut self, node: Node) -> Result<NodeId, ParseError> {
        let initializer = self.lower_for_clause(node.child_by_field_name("initializer"))?;
        let condition = self.lower_for_clause(node.child_by_field_name("condition"))?;
        let incrementor = self.lower_for_clause(node.child_by_field_name("increment"))?;
        let body = self.lower_statement(self.field(node, "body")?)?;
        Ok(self.push(
            node,
            NodeKind::For {
                initializer,
                condition,
                incrementor,
                body,
            },
        ))
    }

    /// A `for` header slot: a declaration list, an expression, or nothing.
    fn lower_for_clause(&mut self, clause: Option<Node>) -> Result<Option<NodeId>, ParseError> {
        let Some(clause) = clause else {
            return Ok(None);
        };
        if !clause.is_named() {
            return Ok(None);
        }
        match clause.kind() {
            "empty_statement" => Ok(None),
            "lexical_declaration" | "variable_declaration" => {
                self.lower_declaration_list(clause).map(Some)
            }
            "expression_statement" => {
                let inner = self.first_named(clause)?;
                self.lower_expression(inner).map(Some)
            }
            _ => self.lower_expression(clause).map(Some),
        }
    }

    fn lower_for_in(&mut self, node: Node) -> Result<NodeId, ParseError> {
        let is_for_of = anonymous_children(node)
            .iter()
            .any(|child| matches!(self.node_text(*child), "of" | "await"));
        if is_for_of {
            return Ok(self.unsupported_as(node, "for_of_statement"));
        }

        let left = self.field(node, "left")?;
        let initializer = if node.child_by_field_name("kind").is_some() {
            let name = self.lower_binding_name(left);
            let declaration = self.push(
                left,
                NodeKind::VariableDeclaration {
                    name,
                    ty: None,
                    initializer: None,
                },
            );
            self.push(
                left,
                NodeKind::VariableDeclarationList {
                    declarations: vec![declaration],
                },
            )
        } else {
            self.lower_expression(left)?
        };
        let expression = self.lower_expression(self.field(node, "right")?)?;
        let body = self.lower_statement(self.field(node, "body")?)?;
        Ok(self.push(
            node,
            NodeKind::ForIn {
                initializer,
                expression,
                body,
            },
        ))
    }

    fn lower_switch(&mut self, node: Node) -> Result<NodeId, ParseError> {
        let value = self.unwrap_parens(self.field(node, "value")?)?;
        let expression = self.lower_expression(value)?;

        let mut clauses = Vec::new();
        for clause in named_children(self.field(node, "body")?) {
            let id = match clause.kind() {
                "switch_case" => {
                    let value = self.field(clause, "value")?;
                    let expression = self.lower_expression(value)?;
                    let mut statements = Vec::new();
                    for child in named_children(clause) {
                        if child.id() != value.id() {
                            statements.push(self.lower_statement(child)?);
                        }
                    }
                    self.push(
                        clause,
                        NodeKind::CaseClause {
                            expression,
                            statements,
                        },
                    )
                }
                "switch_default" => {
                    let mut statements = Vec::new();
                    for child in named_children(clause) {
                        statements.push(self.lower_statement(child)?);
                    }
                    self.push(clause, NodeKind::DefaultClause { statements })
                }
                _ => self.unsupported(clause),
            };
            clauses.push(id);
        }

        Ok(self.push(
            node,
            NodeKind::Switch {
                expression,
                clauses,
            },
        ))
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    /// `outer` is the node whose span the declaration takes: the declaration
    /// itself, or the `export` statement wrapping it.
    fn lower_function(&mut self, decl: Node, outer: Node) -> Result<NodeId, ParseError> {
        let name = self.lower_identifier(self.field(decl, "name")?);
        let type_parameters =
            self.lower_type_parameters(decl.child_by_field_name("type_parameters"))?;
        let parameters = self.lower_parameters(self.field(decl, "parameters")?)?;
        let return_type = self.lower_optional_type(decl.child_by_field_name("return_type"))?;
        let body = self.lower_block(self.field(decl, "body")?)?;
        Ok(self.push(
            outer,
            NodeKind::FunctionDeclaration {
                name,
                type_parameters,
                parameters,
                return_type,
                body,
            },
        ))
    }

    fn lower_class(&mut self, decl: Node, outer: Node) -> Result<NodeId, ParseError> {
        let name = self.lower_identifier(self.field(decl, "name")?);
        let type_parameters =
            self.lower_type_parameters(decl.child_by_field_name("type_parameters"))?;

        let mut heritage_clauses = Vec::new();
        for child in named_children(decl) {
            if child.kind() == "class_heritage" {
                for clause in named_children(child) {
                    heritage_clauses.push(self.lower_heritage_clause(clause)?);
                }
            }
        }

        let mut members = Vec::new();
        for member in named_children(self.field(decl, "body")?) {
            members.push(self.lower_class_member(member)?);
        }

        Ok(self.push(
            outer,
            NodeKind::ClassDeclaration {
                name,
                type_parameters,
                heritage_clauses,
                members,
            },
        ))
    }

    fn lower_heritage_clause(&mut self, clause: Node) -> Result<NodeId, ParseError> {
        match clause.kind() {
            "extends_clause" => {
                // Each supertype is a value expression optionally followed by
                // its type arguments.
                let mut types = Vec::new();
                let mut pending: Option<Node> = None;
                for child in named_children(clause) {
                    if child.kind() == "instantiation_expression" {
                        if let Some(value) = pending.take() {
                            types.push(self.lower_heritage_type(value, None)?);
                        }
                        let value = self.first_named(child)?;
                        let args = child.child_by_field_name("type_arguments");
                        types.push(self.lower_heritage_type(value, args)?);
                    } else if child.kind() == "type_arguments" {
                        if let Some(value) = pending.take() {
                            types.push(self.lower_heritage_type(value, Some(child))?);
                        }
                    } else if let Some(value) = pending.replace(child) {
                        types.push(self.lower_heritage_type(value, None)?);
                    }
                }
                if let Some(value) = pending {
                    types.push(self.lower_heritage_type(value, None)?);
                }
                Ok(self.push(
                    clause,
                    NodeKind::HeritageClause {
                        token: HeritageToken::Extends,
                        types,
                    },
                ))
            }
            "implements_clause" => {
                let mut types = Vec::new();
                for child in named_children(clause) {
                    types.push(self.lower_type(child)?);
                }
                Ok(self.push(
                    clause,
                    NodeKind::HeritageClause {
                        token: HeritageToken::Implements,
                        types,
                    },
                ))
            }
            _ => Ok(self.unsupported(clause)),
        }
    }

    fn lower_heritage_type<'t>(
        &mut self,
        value: Node<'t>,
        type_arguments: Option<Node<'t>>,
    ) -> Result<NodeId, ParseError> {
        let type_name = self.lower_expression(value)?;
        let end = type_arguments.unwrap_or(value).end_byte() as u32;
        let type_arguments = match type_arguments {
            Some(args) => Some(self.lower_type_list(args)?),
            None => None,
        };
        Ok(self.push_at(
            Span::new(value.start_byte() as u32, end),
            position_of(value),
            NodeKind::TypeReference {
                type_name,
                type_arguments,
            },
        ))
    }

    fn lower_class_member(&mut self, member: Node) -> Result<NodeId, ParseError> {
        match member.kind() {
            "method_definition" => self.lower_method(member),
            "public_field_definition" => {
                let name = self.lower_property_name(self.field(member, "name")?);
                let ty = self.lower_optional_type(member.child_by_field_name("type"))?;
                let initializer =
                    self.lower_optional_expression(member.child_by_field_name("value"))?;
                Ok(self.push(
                    member,
                    NodeKind::PropertyDeclaration {
                        name,
                        ty,
                        initializer,
                    },
                ))
            }
            _ => Ok(self.unsupported(member)),
        }
    }

    fn lower_method(&mut self, member: Node) -> Result<NodeId, ParseError> {
        let name_node = self.field(member, "name")?;
        let accessor = anonymous_children(member)
            .into_iter()
            .filter(|child| child.start_byte() < name_node.start_byte())
            .map(|child| self.node_text(child))
            .find(|text| matches!(*text, "get" | "set"));
        if let Some(keyword) = accessor {
            return Ok(self.unsupported_as(member, &format!("{} accessor", keyword)));
        }

        let parameters = self.lower_parameters(self.field(member, "parameters")?)?;
        if self.node_text(name_node) == "constructor" {
            let body = self.lower_block(self.field(member, "body")?)?;
            return Ok(self.push(member, NodeKind::Constructor { parameters, body }));
        }

        let name = self.lower_property_name(name_node);
        let type_parameters =
            self.lower_type_parameters(member.child_by_field_name("type_parameters"))?;
        let return_type = self.lower_optional_type(member.child_by_field_name("return_type"))?;
        let body = self.lower_block(self.field(member, "body")?)?;
        Ok(self.push(
            member,
            NodeKind::MethodDeclaration {
                name,
                type_parameters,
                parameters,
                return_type,
                body,
            },
        ))
    }

    fn lower_parameters(&mut self, list: Node) -> Result<Vec<NodeId>, ParseError> {
        let mut parameters = Vec::new();
        for param in named_children(list) {
            let id = match param.kind() {
                "required_parameter" | "optional_parameter" => self.lower_parameter(param)?,
                _ => self.unsupported(param),
            };
            parameters.push(id);
        }
        Ok(parameters)
    }

    fn lower_parameter(&mut self, param: Node) -> Result<NodeId, ParseError> {
        let pattern = self.field(param, "pattern")?;
        let (name, rest) = if pattern.kind() == "rest_pattern" {
            (self.lower_binding_name(self.first_named(pattern)?), true)
        } else {
            (self.lower_binding_name(pattern), false)
        };
        let ty = self.lower_optional_type(param.child_by_field_name("type"))?;
        let initializer = self.lower_optional_expression(param.child_by_field_name("value"))?;
        Ok(self.push(
            param,
            NodeKind::Parameter {
                name,
                ty,
                initializer,
                rest,
            },
        ))
    }

    fn lower_type_parameters(
        &mut self,
        list: Option<Node>,
    ) -> Result<Option<Vec<NodeId>>, ParseError> {
        let Some(list) = list else {
            return Ok(None);
        };
        let mut params = Vec::new();
        for param in named_children(list) {
            if param.kind() != "type_parameter" {
                params.push(self.unsupported(param));
                continue;
            }
            let name = self.lower_identifier(self.field(param, "name")?);
            let constraint = match param.child_by_field_name("constraint") {
                Some(constraint) => Some(self.lower_type(self.first_named(constraint)?)?),
                None => None,
            };
            params.push(self.push(param, NodeKind::TypeParameter { name, constraint }));
        }
        Ok(Some(params))
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    fn lower_optional_type(&mut self, node: Option<Node>) -> Result<Option<NodeId>, ParseError> {
        match node {
            Some(node) => self.lower_type(node).map(Some),
            None => Ok(None),
        }
    }

    fn lower_type(&mut self, node: Node) -> Result<NodeId, ParseError> {
        match node.kind() {
            "type_annotation" => {
                let inner = self.first_named(node)?;
                self.lower_type(inner)
            }
            "predefined_type" => {
                let text = self.node_text(node);
                match TypeKeyword::from_keyword(text) {
                    Some(keyword) => Ok(self.push(node, NodeKind::KeywordType(keyword))),
                    None => Ok(self.unsupported_as(node, &format!("predefined_type '{}'", text))),
                }
            }
            "type_identifier" => {
                let type_name = self.lower_identifier(node);
                Ok(self.push(
                    node,
                    NodeKind::TypeReference {
                        type_name,
                        type_arguments: None,
                    },
                ))
            }
            "generic_type" => {
                let name = self.field(node, "name")?;
                let type_name = if name.kind() == "type_identifier" {
                    self.lower_identifier(name)
                } else {
                    self.unsupported(name)
                };
                let type_arguments = match node.child_by_field_name("type_arguments") {
                    Some(args) => Some(self.lower_type_list(args)?),
                    None => None,
                };
                Ok(self.push(
                    node,
                    NodeKind::TypeReference {
                        type_name,
                        type_arguments,
                    },
                ))
            }
            _ => Ok(self.unsupported(node)),
        }
    }

    fn lower_type_list(&mut self, list: Node) -> Result<Vec<NodeId>, ParseError> {
        let mut types = Vec::new();
        for child in named_children(list) {
            types.push(self.lower_type(child)?);
        }
        Ok(types)
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn lower_identifier(&mut self, node: Node) -> NodeId {
        let text = self.node_text(node).to_string();
        self.push(node, NodeKind::Identifier { text })
    }

    fn lower_binding_name(&mut self, node: Node) -> NodeId {
        match node.kind() {
            "identifier" => self.lower_identifier(node),
            _ => self.unsupported(node),
        }
    }

    fn lower_property_name(&mut self, node: Node) -> NodeId {
        match node.kind() {
            "property_identifier" | "identifier" => self.lower_identifier(node),
            _ => self.unsupported(node),
        }
    }

    fn lower_optional_expression(
        &mut self,
        node: Option<Node>,
    ) -> Result<Option<NodeId>, ParseError> {
        match node {
            Some(node) => self.lower_expression(node).map(Some),
            None => Ok(None),
        }
    }

    fn lower_expression(&mut self, node: Node) -> Result<NodeId, ParseError> {
        match node.kind() {
            "identifier" | "property_identifier" | "shorthand_property_identifier"
            | "undefined" => Ok(self.lower_identifier(node)),

            // Literals
            "number" => {
                let text = self.node_text(node).to_string();
                Ok(self.push(node, NodeKind::NumericLiteral { text }))
            }
            "string" => {
                let value = unescape_string(self.node_text(node));
                Ok(self.push(node, NodeKind::StringLiteral { value }))
            }
            "regex" => {
                let text = self.node_text(node).to_string();
                Ok(self.push(node, NodeKind::RegularExpressionLiteral { text }))
            }
            "true" => Ok(self.push(node, NodeKind::TrueKeyword)),
            "false" => Ok(self.push(node, NodeKind::FalseKeyword)),
            "null" => Ok(self.push(node, NodeKind::NullKeyword)),
            "this" => Ok(self.push(node, NodeKind::ThisKeyword)),

            "parenthesized_expression" => {
                let expression = self.lower_expression(self.first_named(node)?)?;
                Ok(self.push(node, NodeKind::Parenthesized { expression }))
            }
            "member_expression" => self.lower_member(node),
            "subscript_expression" => {
                if has_optional_chain(node) {
                    return Ok(self.unsupported_as(node, "optional_chain"));
                }
                let expression = self.lower_expression(self.field(node, "object")?)?;
                let argument = self.lower_expression(self.field(node, "index")?)?;
                Ok(self.push(
                    node,
                    NodeKind::ElementAccess {
                        expression,
                        argument,
                    },
                ))
            }
            "call_expression" => self.lower_call(node),
            "new_expression" => {
                let expression = self.lower_expression(self.field(node, "constructor")?)?;
                let arguments = match node.child_by_field_name("arguments") {
                    Some(args) => self.lower_arguments(args)?,
                    None => Vec::new(),
                };
                Ok(self.push(
                    node,
                    NodeKind::New {
                        expression,
                        arguments,
                    },
                ))
            }

            // Operators
            "binary_expression" | "augmented_assignment_expression" => self.lower_binary(node),
            "assignment_expression" => {
                let left = self.lower_expression(self.field(node, "left")?)?;
                let right = self.lower_expression(self.field(node, "right")?)?;
                Ok(self.push(
                    node,
                    NodeKind::Binary {
                        left,
                        operator: BinaryOperator::Equals,
                        right,
                    },
                ))
            }
            "sequence_expression" => self.lower_sequence(node),
            "unary_expression" => self.lower_unary(node),
            "update_expression" => self.lower_update(node),
            "ternary_expression" => {
                let condition = self.lower_expression(self.field(node, "condition")?)?;
                let when_true = self.lower_expression(self.field(node, "consequence")?)?;
                let when_false = self.lower_expression(self.field(node, "alternative")?)?;
                Ok(self.push(
                    node,
                    NodeKind::Conditional {
                        condition,
                        when_true,
                        when_false,
                    },
                ))
            }

            _ => Ok(self.unsupported(node)),
        }
    }

    fn lower_member(&mut self, node: Node) -> Result<NodeId, ParseError> {
        if has_optional_chain(node) {
            return Ok(self.unsupported_as(node, "optional_chain"));
        }
        let expression = self.lower_expression(self.field(node, "object")?)?;
        let property = self.field(node, "property")?;
        let name = self.lower_property_name(property);
        Ok(self.push(node, NodeKind::PropertyAccess { expression, name }))
    }

    fn lower_call(&mut self, node: Node) -> Result<NodeId, ParseError> {
        if has_optional_chain(node) {
            return Ok(self.unsupported_as(node, "optional_chain"));
        }
        let args = self.field(node, "arguments")?;
        if args.kind() != "arguments" {
            return Ok(self.unsupported_as(node, "tagged template"));
        }
        let expression = self.lower_expression(self.field(node, "function")?)?;
        let arguments = self.lower_arguments(args)?;
        Ok(self.push(
            node,
            NodeKind::Call {
                expression,
                arguments,
            },
        ))
    }

    fn lower_arguments(&mut self, args: Node) -> Result<Vec<NodeId>, ParseError> {
        let mut arguments = Vec::new();
        for arg in named_children(args) {
            arguments.push(self.lower_expression(arg)?);
        }
        Ok(arguments)
    }

    fn lower_binary(&mut self, node: Node) -> Result<NodeId, ParseError> {
        let token = self.node_text(self.field(node, "operator")?);
        let Some(operator) = BinaryOperator::from_token(token) else {
            return Ok(self.unsupported_as(node, &format!("binary operator '{}'", token)));
        };
        let left = self.lower_expression(self.field(node, "left")?)?;
        let right = self.lower_expression(self.field(node, "right")?)?;
        Ok(self.push(
            node,
            NodeKind::Binary {
                left,
                operator,
                right,
            },
        ))
    }

    /// `a, b, c` folds left into comma binaries.
    fn lower_sequence(&mut self, node: Node) -> Result<NodeId, ParseError> {
        let mut operands = named_children(node).into_iter();
        let first = operands
            .next()
            .ok_or_else(|| self.malformed(node, "an operand"))?;
        let mut left = self.lower_expression(first)?;
        for operand in operands {
            let right = self.lower_expression(operand)?;
            left = self.push_at(
                Span::new(node.start_byte() as u32, operand.end_byte() as u32),
                position_of(node),
                NodeKind::Binary {
                    left,
                    operator: BinaryOperator::Comma,
                    right,
                },
            );
        }
        Ok(left)
    }

    fn lower_unary(&mut self, node: Node) -> Result<NodeId, ParseError> {
        let token = self.node_text(self.field(node, "operator")?);
        let operand = self.lower_expression(self.field(node, "argument")?)?;
        let kind = match token {
            "typeof" => NodeKind::TypeOf {
                expression: operand,
            },
            "void" => NodeKind::Void {
                expression: operand,
            },
            "delete" => NodeKind::Delete {
                expression: operand,
            },
            _ => match PrefixOperator::from_token(token) {
                Some(operator) => NodeKind::PrefixUnary { operator, operand },
                None => NodeKind::Unsupported {
                    kind: format!("unary operator '{}'", token),
                },
            },
        };
        Ok(self.push(node, kind))
    }

    fn lower_update(&mut self, node: Node) -> Result<NodeId, ParseError> {
        let operator_node = self.field(node, "operator")?;
        let argument = self.field(node, "argument")?;
        let token = self.node_text(operator_node);
        let operand = self.lower_expression(argument)?;

        let kind = if operator_node.start_byte() < argument.start_byte() {
            PrefixOperator::from_token(token)
                .map(|operator| NodeKind::PrefixUnary { operator, operand })
        } else {
            PostfixOperator::from_token(token)
                .map(|operator| NodeKind::PostfixUnary { operator, operand })
        };
        let kind = kind.unwrap_or_else(|| NodeKind::Unsupported {
            kind: format!("update operator '{}'", token),
        });
        Ok(self.push(node, kind))
    }
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

fn anonymous_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| !child.is_named())
        .collect()
}

fn has_optional_chain(node: Node) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .any(|child| child.kind() == "optional_chain" || child.kind() == "?.")
}

fn position_of(node: Node) -> Position {
    let point = node.start_position();
    Position {
        line: point.row as u32,
        column: point.column as u32,
    }
}

fn position_at(text: &str, offset: usize) -> Position {
    let before = &text[..offset];
    let line = before.matches('\n').count() as u32;
    let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
    Position {
        line,
        column: (offset - line_start) as u32,
    }
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn collect_token_ends(root: Node) -> Vec<u32> {
    let mut ends = Vec::new();
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.child_count() == 0
            && !node.is_extra()
            && node.end_byte() > node.start_byte()
        {
            ends.push(node.end_byte() as u32);
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                ends.sort_unstable();
                return ends;
            }
        }
    }
}

/// Decode a quoted string literal, resolving escape sequences.
///
/// Decoding goes through UTF-16 code units so surrogate-pair escapes
/// (`\uD83D\uDE00`) combine the way they do at runtime.
pub fn unescape_string(literal: &str) -> String {
    let inner = literal
        .get(1..literal.len().saturating_sub(1))
        .unwrap_or("");
    let mut units: Vec<u16> = Vec::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();

    let push_char = |units: &mut Vec<u16>, ch: char| {
        let mut buf = [0u16; 2];
        units.extend_from_slice(ch.encode_utf16(&mut buf));
    };

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            push_char(&mut units, ch);
            continue;
        }
        let Some(escaped) = chars.next() else {
            break;
        };
        match escaped {
            'n' => units.push(0x0A),
            't' => units.push(0x09),
            'r' => units.push(0x0D),
            'b' => units.push(0x08),
            'f' => units.push(0x0C),
            'v' => units.push(0x0B),
            '0' if !chars.peek().is_some_and(|next| next.is_ascii_digit()) => units.push(0),
            'x' => match take_hex(&mut chars, 2) {
                Some(code) => units.push(code as u16),
                None => push_char(&mut units, 'x'),
            },
            'u' if chars.peek() == Some(&'{') => {
                chars.next();
                let digits: String = chars.by_ref().take_while(|c| *c != '}').collect();
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => push_char(&mut units, decoded),
                    None => push_char(&mut units, 'u'),
                }
            }
            'u' => match take_hex(&mut chars, 4) {
                Some(code) => units.push(code as u16),
                None => push_char(&mut units, 'u'),
            },
            // Line continuations contribute nothing.
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => push_char(&mut units, other),
        }
    }

    String::from_utf16_lossy(&units)
}

fn take_hex(chars: &mut std::iter::Peekable<std::str::Chars>, count: usize) -> Option<u32> {
    let mut value = 0;
    for _ in 0..count {
        let digit = chars.peek()?.to_digit(16)?;
        chars.next();
        value = value * 16 + digit;
    }
    Some(value)
}
