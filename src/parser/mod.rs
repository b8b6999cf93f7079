//! Recursive-descent parser (spec §4.2).
//!
//! Grounded on `original_source/src/parser.c`'s hand-written descent over
//! the lexer's token stream (the teacher's own parser instead runs on
//! `pest`/`rust-sitter` grammars operating directly on source text — see
//! DESIGN.md for why that shape doesn't fit spec's flat `Token` stream
//! contract).

pub mod ast;
mod error;

pub use error::ParseError;

use std::collections::HashSet;

use crate::lexer::{Token, TokenKind};
use crate::module::Module;
use crate::types::{Base, Type};
use ast::{
    ArrayDeref, BinaryOp, Builtin, Call, EnumDef, EnumField, Function, Get, If, Let, Node, NodeKind, NumberLiteral,
    NumberValue, Prototype, StringLiteral, StructDef, StructField, StructValue, StructValueField, UnaryOp, Variable,
    While,
};

type PResult<T> = Result<T, ParseError>;

/// `{ name, type }` from spec §3 — collected while parsing `type Name =
/// <type>;` declarations, then consumed by [`crate::ast::resolve_aliases`].
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    pub name: String,
    pub ty: Type,
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    file_path: String,
    struct_names: HashSet<String>,
    enum_names: HashSet<String>,
    aliases: Vec<TypeAlias>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, file_path: impl Into<String>) -> Self {
        let file_path = file_path.into();
        let mut struct_names = HashSet::new();
        let mut enum_names = HashSet::new();
        prescan_type_names(&tokens, &mut struct_names, &mut enum_names);

        Parser {
            tokens,
            pos: 0,
            file_path,
            struct_names,
            enum_names,
            aliases: Vec::new(),
        }
    }

    /// The `type` declarations collected while parsing. Only meaningful
    /// after [`Parser::parse_module`] has run.
    pub fn aliases(&self) -> &[TypeAlias] {
        &self.aliases
    }

    // --- token stream helpers -------------------------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, ctx: &str) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::at(
                self.peek(),
                format!("expected {ctx} but found {:?}", self.peek_kind()),
            ))
        }
    }

    fn expect_identifier(&mut self, ctx: &str) -> PResult<String> {
        let token = self.expect(TokenKind::Identifier, ctx)?;
        Ok(token.lexeme)
    }

    // --- module-level entry point ---------------------------------------------

    pub fn parse_module(&mut self) -> PResult<Module> {
        let mut module = Module::new(self.file_path.clone());

        while !self.check(TokenKind::Eof) {
            match self.peek_kind() {
                TokenKind::Fn => {
                    let func = self.parse_function(false)?;
                    module.functions.push(func);
                }
                TokenKind::Extern => {
                    let func = self.parse_function(true)?;
                    module.functions.push(func);
                }
                TokenKind::Struct => {
                    module.structs.push(self.parse_struct_def()?);
                }
                TokenKind::Enum => {
                    module.enums.push(self.parse_enum_def()?);
                }
                TokenKind::Import => {
                    module.import_paths.push(self.parse_import()?);
                }
                TokenKind::Type => {
                    let alias = self.parse_type_alias()?;
                    self.aliases.push(alias);
                }
                TokenKind::Let => {
                    module.variables.push(self.parse_let(true)?);
                    self.expect(TokenKind::SemiColon, "';' after top-level let")?;
                }
                other => {
                    return Err(ParseError::at(self.peek(), format!("unexpected top-level token {other:?}")));
                }
            }
        }

        Ok(module)
    }

    fn parse_import(&mut self) -> PResult<String> {
        self.expect(TokenKind::Import, "'import'")?;
        let path = match self.peek_kind() {
            TokenKind::String => self.advance().lexeme,
            TokenKind::Identifier => self.advance().lexeme,
            _ => return Err(ParseError::at(self.peek(), "expected a module path or name after 'import'")),
        };
        self.expect(TokenKind::SemiColon, "';' after import")?;
        Ok(path)
    }

    fn parse_type_alias(&mut self) -> PResult<TypeAlias> {
        self.expect(TokenKind::Type, "'type'")?;
        let name = self.expect_identifier("an alias name")?;
        self.expect(TokenKind::Equals, "'=' in type alias")?;
        let ty = self.parse_type()?;
        self.expect(TokenKind::SemiColon, "';' after type alias")?;
        Ok(TypeAlias { name, ty })
    }

    // --- types ------------------------------------------------------------------

    fn parse_type(&mut self) -> PResult<Type> {
        let mut mutable = false;
        while self.matches(TokenKind::Mut) {
            mutable = true;
        }

        let mut ty = self.parse_base_type()?;

        loop {
            if self.matches(TokenKind::Star) {
                ty = Type::ptr(ty);
            } else if self.check(TokenKind::OpenBracket) {
                self.advance();
                self.expect(TokenKind::CloseBracket, "']' to close array type suffix")?;
                ty = Type::array(ty);
            } else if self.matches(TokenKind::Mut) {
                mutable = true;
            } else {
                break;
            }
        }

        ty.mutable = mutable;
        Ok(ty)
    }

    fn parse_base_type(&mut self) -> PResult<Type> {
        let token = self.advance();
        let base = match token.kind {
            TokenKind::IntType => Base::S32,
            TokenKind::CharType => Base::U8,
            TokenKind::StringType => Base::String,
            TokenKind::VoidType => Base::Void,
            TokenKind::FloatType => Base::F32,
            TokenKind::DoubleType => Base::F64,
            TokenKind::AnyType => Base::Any,
            TokenKind::BoolType => Base::Bool,
            TokenKind::U8Type => Base::U8,
            TokenKind::U16Type => Base::U16,
            TokenKind::U32Type => Base::U32,
            TokenKind::U64Type => Base::U64,
            TokenKind::S8Type => Base::S8,
            TokenKind::S16Type => Base::S16,
            TokenKind::S32Type => Base::S32,
            TokenKind::S64Type => Base::S64,
            TokenKind::F32Type => Base::F32,
            TokenKind::F64Type => Base::F64,
            TokenKind::Identifier => {
                let name = token.lexeme.clone();
                if self.struct_names.contains(&name) {
                    return Ok(Type::named(Base::Struct, name));
                }
                if self.enum_names.contains(&name) {
                    return Ok(Type::named(Base::Enum, name));
                }
                return Ok(Type::named(Base::Alias, name));
            }
            other => {
                return Err(ParseError::at(&token, format!("unknown type token {other:?}")));
            }
        };
        Ok(Type::new(base))
    }

    // --- top-level items ---------------------------------------------------------

    fn parse_function(&mut self, is_extern: bool) -> PResult<Function> {
        if is_extern {
            self.expect(TokenKind::Extern, "'extern'")?;
        }
        self.expect(TokenKind::Fn, "'fn'")?;
        let mut name = self.expect_identifier("a function name")?;
        // `Struct.method` declares the free function a method-call-sugar
        // rewrite (§4.8) targets; without this, `S.m` could never resolve
        // against a real prototype, since `S.m(...)` isn't itself callable
        // syntax and no struct-embedded method declaration exists.
        if self.matches(TokenKind::Dot) {
            let method = self.expect_identifier("a method name after '.'")?;
            name = format!("{name}.{method}");
        }
        self.expect(TokenKind::OpenParen, "'(' after function name")?;

        let mut args = Vec::new();
        let mut arg_types = Vec::new();
        let mut is_variadic = false;

        if !self.check(TokenKind::CloseParen) {
            loop {
                if self.matches(TokenKind::ThreeDots) {
                    is_variadic = true;
                    break;
                }
                let param_name = self.expect_identifier("a parameter name")?;
                self.expect(TokenKind::Colon, "':' after parameter name")?;
                let param_type = self.parse_type()?;
                args.push(param_name);
                arg_types.push(param_type);

                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::CloseParen, "')' to close parameter list")?;

        let return_type = if self.matches(TokenKind::Colon) {
            self.parse_type()?
        } else {
            Type::new(Base::Void)
        };

        let prototype = Prototype {
            name,
            args,
            arg_types,
            return_type,
            is_variadic,
        };

        if is_extern {
            self.expect(TokenKind::SemiColon, "';' after extern prototype")?;
            return Ok(Function { prototype, body: vec![] });
        }

        let body = self.parse_block()?;
        Ok(Function { prototype, body })
    }

    fn parse_struct_def(&mut self) -> PResult<StructDef> {
        self.expect(TokenKind::Struct, "'struct'")?;
        let name = self.expect_identifier("a struct name")?;
        self.expect(TokenKind::OpenBrace, "'{' to open struct body")?;

        let mut fields = Vec::new();
        while !self.check(TokenKind::CloseBrace) {
            let field_name = self.expect_identifier("a field name")?;
            self.expect(TokenKind::Colon, "':' after field name")?;
            let field_type = self.parse_type()?;
            fields.push(StructField {
                name: field_name,
                ty: field_type,
            });
            if !self.matches(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::CloseBrace, "'}' to close struct body")?;
        Ok(StructDef { name, fields })
    }

    fn parse_enum_def(&mut self) -> PResult<EnumDef> {
        self.expect(TokenKind::Enum, "'enum'")?;
        let name = self.expect_identifier("an enum name")?;
        self.expect(TokenKind::OpenBrace, "'{' to open enum body")?;

        let mut fields = Vec::new();
        let mut next_value: i32 = 0;
        while !self.check(TokenKind::CloseBrace) {
            let field_name = self.expect_identifier("an enum field name")?;
            let token = self.peek().clone();
            let explicit = if self.matches(TokenKind::Equals) {
                Some(self.parse_unary()?)
            } else {
                None
            };
            let value = match explicit {
                Some(expr) => {
                    next_value = Self::enum_constant_value(&expr).unwrap_or(next_value);
                    expr
                }
                None => Node::new(NodeKind::Number(NumberLiteral { ty: Type::new(Base::S32), value: NumberValue::S32(next_value) }), Some(token)),
            };
            next_value += 1;
            fields.push(EnumField { name: field_name, value: Some(value) });
            if !self.matches(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::CloseBrace, "'}' to close enum body")?;
        Ok(EnumDef { name, fields })
    }

    /// Reads the `s32` a parsed enum-constant expression denotes, so the
    /// running counter (spec §8 scenario 4) can resume from an explicit
    /// value, matching `original_source/src/parser.c:1766-1776`'s
    /// `value = expr->number.value.s32; ++value`.
    fn enum_constant_value(node: &Node) -> Option<i32> {
        match &node.kind {
            NodeKind::Number(NumberLiteral { value: NumberValue::S32(v), .. }) => Some(*v),
            NodeKind::Unary { op: UnaryOp::Minus, operand } => Self::enum_constant_value(operand).map(|v| -v),
            _ => None,
        }
    }

    // --- statements ---------------------------------------------------------------

    fn parse_block(&mut self) -> PResult<Vec<Node>> {
        self.expect(TokenKind::OpenBrace, "'{' to open a block")?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::CloseBrace) {
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::CloseBrace, "'}' to close a block")?;
        Ok(statements)
    }

    fn parse_statement(&mut self) -> PResult<Node> {
        match self.peek_kind() {
            TokenKind::Return => self.parse_return(),
            TokenKind::Let => {
                let stmt = self.parse_let(false)?;
                self.expect(TokenKind::SemiColon, "';' after let statement")?;
                Ok(Node::new(NodeKind::Let(stmt), None))
            }
            TokenKind::Break => {
                let token = self.advance();
                self.expect(TokenKind::SemiColon, "';' after break")?;
                Ok(Node::new(NodeKind::Break, Some(token)))
            }
            TokenKind::Struct => {
                let def = self.parse_struct_def()?;
                self.struct_names.insert(def.name.clone());
                Ok(Node::new(NodeKind::StructDef(def), None))
            }
            TokenKind::Enum => {
                let def = self.parse_enum_def()?;
                self.enum_names.insert(def.name.clone());
                Ok(Node::new(NodeKind::EnumDef(def), None))
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_return(&mut self) -> PResult<Node> {
        let token = self.advance();
        if self.matches(TokenKind::SemiColon) {
            return Ok(Node::new(NodeKind::Return(None), Some(token)));
        }
        let expr = self.parse_expression()?;
        self.expect(TokenKind::SemiColon, "';' after return expression")?;
        Ok(Node::new(NodeKind::Return(Some(Box::new(expr))), Some(token)))
    }

    fn parse_let(&mut self, is_global: bool) -> PResult<Let> {
        let let_token = self.expect(TokenKind::Let, "'let'")?;
        let _ = let_token;
        let mutable = self.matches(TokenKind::Mut);
        let name = self.expect_identifier("a variable name")?;

        let annotated = if self.matches(TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        self.expect(TokenKind::Equals, "'=' in let binding")?;
        let initializer = self.parse_expression()?;

        let mut variable = Variable::new(name);
        variable.mutable = mutable;
        variable.ty = annotated;

        Ok(Let {
            variable,
            initializer: Box::new(initializer),
            is_global,
        })
    }

    /// An expression-statement's expression must be followed by `;` unless
    /// it is itself a compound expression (`if`/`while`), per spec §4.2 —
    /// or unless it is the last statement in its block, where it stands as
    /// the block's tail value (spec §8 scenario 2: `fn id(x: s32): s32 { x
    /// }` has no trailing `;`; last-expression promotion only has
    /// something to promote if plain tail expressions are legal too).
    fn parse_expression_statement(&mut self) -> PResult<Node> {
        let expr = self.parse_expression()?;
        let is_compound = matches!(expr.kind, NodeKind::If(_) | NodeKind::While(_));
        let is_tail_position = self.check(TokenKind::CloseBrace);
        if !is_compound && !is_tail_position {
            self.expect(TokenKind::SemiColon, "';' after expression statement")?;
        } else {
            self.matches(TokenKind::SemiColon);
        }
        Ok(Node::new(NodeKind::ExpressionStmt(Box::new(expr)), None))
    }

    // --- expressions: precedence climbing ------------------------------------------

    fn parse_expression(&mut self) -> PResult<Node> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> PResult<Node> {
        let lhs = self.parse_equality()?;

        if self.check(TokenKind::Equals) {
            let token = self.advance();
            Self::validate_assignment_target(&lhs, &token)?;
            let rhs = self.parse_assignment()?;
            return Ok(Node::new(
                NodeKind::Assignment {
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                Some(token),
            ));
        }

        Ok(lhs)
    }

    /// lhs must be one of: variable reference, dereference unary,
    /// get-expression, array-dereference (spec §3).
    fn validate_assignment_target(node: &Node, token: &Token) -> PResult<()> {
        let valid = matches!(
            &node.kind,
            NodeKind::Variable(_)
                | NodeKind::Get(_)
                | NodeKind::ArrayDeref(_)
                | NodeKind::Unary { op: UnaryOp::Deref, .. }
        );
        if valid {
            Ok(())
        } else {
            Err(ParseError::at(token, "invalid assignment target"))
        }
    }

    fn parse_equality(&mut self) -> PResult<Node> {
        let mut node = self.parse_comparison()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinaryOp::Equal,
                TokenKind::Neq => BinaryOp::NotEqual,
                _ => break,
            };
            let token = self.advance();
            let rhs = self.parse_comparison()?;
            node = Node::new(
                NodeKind::Binary {
                    op,
                    lhs: Box::new(node),
                    rhs: Box::new(rhs),
                },
                Some(token),
            );
        }
        Ok(node)
    }

    fn parse_comparison(&mut self) -> PResult<Node> {
        let mut node = self.parse_term()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::OpenAngle => BinaryOp::Less,
                TokenKind::CloseAngle => BinaryOp::Greater,
                TokenKind::Leq => BinaryOp::LessEq,
                TokenKind::Geq => BinaryOp::GreaterEq,
                _ => break,
            };
            let token = self.advance();
            let rhs = self.parse_term()?;
            node = Node::new(
                NodeKind::Binary {
                    op,
                    lhs: Box::new(node),
                    rhs: Box::new(rhs),
                },
                Some(token),
            );
        }
        Ok(node)
    }

    fn parse_term(&mut self) -> PResult<Node> {
        let mut node = self.parse_factor()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Subtract,
                _ => break,
            };
            let token = self.advance();
            let rhs = self.parse_factor()?;
            node = Node::new(
                NodeKind::Binary {
                    op,
                    lhs: Box::new(node),
                    rhs: Box::new(rhs),
                },
                Some(token),
            );
        }
        Ok(node)
    }

    fn parse_factor(&mut self) -> PResult<Node> {
        let mut node = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Multiply,
                TokenKind::Slash => BinaryOp::Divide,
                TokenKind::Percent => BinaryOp::Modulo,
                _ => break,
            };
            let token = self.advance();
            let rhs = self.parse_unary()?;
            node = Node::new(
                NodeKind::Binary {
                    op,
                    lhs: Box::new(node),
                    rhs: Box::new(rhs),
                },
                Some(token),
            );
        }
        Ok(node)
    }

    fn parse_unary(&mut self) -> PResult<Node> {
        let op = match self.peek_kind() {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Star => Some(UnaryOp::Deref),
            TokenKind::Ampersand => Some(UnaryOp::Ref),
            _ => None,
        };

        if let Some(op) = op {
            let token = self.advance();
            let operand = self.parse_unary()?;
            return Ok(Node::new(
                NodeKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                Some(token),
            ));
        }

        self.parse_cast()
    }

    /// "A trailing `as <type>` on any expression becomes a cast" (spec
    /// §4.2), implemented as a postfix loop so `x as s32 as u8` chains.
    fn parse_cast(&mut self) -> PResult<Node> {
        let mut node = self.parse_primary()?;
        while self.check(TokenKind::As) {
            let token = self.advance();
            let target = self.parse_type()?;
            node = Node::new(
                NodeKind::Cast {
                    expr: Box::new(node),
                    target,
                },
                Some(token),
            );
        }
        Ok(node)
    }

    fn parse_primary(&mut self) -> PResult<Node> {
        match self.peek_kind() {
            TokenKind::Number => self.parse_number(),
            TokenKind::String => {
                let token = self.advance();
                Ok(Node::new(
                    NodeKind::String(StringLiteral { value: token.lexeme.clone() }),
                    Some(token),
                ))
            }
            TokenKind::Null => {
                let token = self.advance();
                Ok(Node::new(NodeKind::Literal(ast::LiteralKind::Null), Some(token)))
            }
            TokenKind::True => {
                let token = self.advance();
                Ok(Node::new(NodeKind::Literal(ast::LiteralKind::True), Some(token)))
            }
            TokenKind::False => {
                let token = self.advance();
                Ok(Node::new(NodeKind::Literal(ast::LiteralKind::False), Some(token)))
            }
            TokenKind::OpenParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::CloseParen, "')' to close parenthesized expression")?;
                Ok(inner)
            }
            TokenKind::OpenBracket => self.parse_array_literal(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Identifier => self.parse_identifier_primary(),
            other => Err(ParseError::at(self.peek(), format!("unexpected token {other:?} in expression"))),
        }
    }

    fn parse_array_literal(&mut self) -> PResult<Node> {
        let token = self.expect(TokenKind::OpenBracket, "'['")?;
        let mut elements = Vec::new();
        if !self.check(TokenKind::CloseBracket) {
            loop {
                elements.push(self.parse_expression()?);
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::CloseBracket, "']' to close array literal")?;
        Ok(Node::new(NodeKind::ArrayLiteral(elements), Some(token)))
    }

    fn parse_number(&mut self) -> PResult<Node> {
        let token = self.advance();
        let text = token.lexeme.as_str();
        let is_float = text.contains('.');
        let is_f32 = text.ends_with('f');
        let digits = text.trim_end_matches('f');

        let (ty, value) = if is_float {
            let parsed: f64 = digits
                .parse()
                .map_err(|_| ParseError::at(&token, format!("malformed float literal '{text}'")))?;
            if is_f32 {
                (Type::new(Base::F32), NumberValue::F32(parsed as f32))
            } else {
                (Type::new(Base::F64), NumberValue::F64(parsed))
            }
        } else {
            let parsed: i32 = digits
                .parse()
                .map_err(|_| ParseError::at(&token, format!("malformed integer literal '{text}'")))?;
            (Type::new(Base::S32), NumberValue::S32(parsed))
        };

        Ok(Node::new(NodeKind::Number(NumberLiteral { ty, value }), Some(token)))
    }

    fn parse_if(&mut self) -> PResult<Node> {
        let token = self.expect(TokenKind::If, "'if'")?;
        let condition = self.parse_expression()?;
        let then_body = self.parse_block()?;
        let else_body = if self.matches(TokenKind::Else) {
            if self.check(TokenKind::If) {
                vec![self.parse_if()?]
            } else {
                self.parse_block()?
            }
        } else {
            Vec::new()
        };

        Ok(Node::new(
            NodeKind::If(If {
                condition: Box::new(condition),
                then_body,
                else_body,
            }),
            Some(token),
        ))
    }

    fn parse_while(&mut self) -> PResult<Node> {
        let token = self.expect(TokenKind::While, "'while'")?;
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(Node::new(
            NodeKind::While(While {
                condition: Box::new(condition),
                body,
            }),
            Some(token),
        ))
    }

    fn parse_identifier_primary(&mut self) -> PResult<Node> {
        let token = self.advance();
        let name = token.lexeme.clone();

        if name.starts_with('@') {
            return self.parse_builtin_call(name, token);
        }

        if self.struct_names.contains(&name) && self.check(TokenKind::OpenBrace) {
            return self.parse_struct_value(name, token);
        }

        let base = if self.matches(TokenKind::DoubleColon) {
            let key = self.expect_identifier("an enum value name")?;
            Node::new(
                NodeKind::Get(Get {
                    variable: Variable::new(name),
                    key,
                    is_enum: true,
                }),
                Some(token.clone()),
            )
        } else if self.matches(TokenKind::Dot) {
            let key = self.expect_identifier("a field name")?;
            Node::new(
                NodeKind::Get(Get {
                    variable: Variable::new(name),
                    key,
                    is_enum: false,
                }),
                Some(token.clone()),
            )
        } else if self.check(TokenKind::OpenBracket) {
            self.advance();
            let index = self.parse_expression()?;
            self.expect(TokenKind::CloseBracket, "']' to close array index")?;
            Node::new(
                NodeKind::ArrayDeref(ArrayDeref {
                    indexable: Variable::new(name),
                    index: Box::new(index),
                }),
                Some(token.clone()),
            )
        } else {
            Node::new(NodeKind::Variable(Variable::new(name)), Some(token.clone()))
        };

        if self.check(TokenKind::OpenParen) {
            return self.parse_call(base, token);
        }

        Ok(base)
    }

    fn parse_builtin_call(&mut self, name: String, token: Token) -> PResult<Node> {
        self.expect(TokenKind::OpenParen, "'(' after builtin name")?;
        if name == "@sizeOf" {
            let target = self.parse_type()?;
            self.expect(TokenKind::CloseParen, "')' to close @sizeOf")?;
            return Ok(Node::new(NodeKind::Sizeof(Box::new(target)), Some(token)));
        }

        let mut args = Vec::new();
        if !self.check(TokenKind::CloseParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::CloseParen, "')' to close builtin call")?;
        Ok(Node::new(NodeKind::Builtin(Builtin { name, args }), Some(token)))
    }

    fn parse_call(&mut self, callable: Node, token: Token) -> PResult<Node> {
        self.expect(TokenKind::OpenParen, "'(' to open call arguments")?;
        let mut args = Vec::new();
        if !self.check(TokenKind::CloseParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::CloseParen, "')' to close call arguments")?;
        Ok(Node::new(
            NodeKind::Call(Call {
                callable: Box::new(callable),
                args,
            }),
            Some(token),
        ))
    }

    fn parse_struct_value(&mut self, name: String, token: Token) -> PResult<Node> {
        self.expect(TokenKind::OpenBrace, "'{' to open struct literal")?;
        let mut fields = Vec::new();
        while !self.check(TokenKind::CloseBrace) {
            let field_name = self.expect_identifier("a struct field name")?;
            self.expect(TokenKind::Colon, "':' after struct field name")?;
            let value = self.parse_expression()?;
            fields.push(StructValueField { name: field_name, value });
            if !self.matches(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::CloseBrace, "'}' to close struct literal")?;
        Ok(Node::new(NodeKind::StructValue(StructValue { name, fields }), Some(token)))
    }
}

/// One-pass scan of the whole token stream for `struct Name` / `enum Name`
/// declarations, so the parser's "local set of in-scope struct and enum
/// names" (spec §4.2) already contains names used before their definition
/// or nested inside a later function body.
fn prescan_type_names(tokens: &[Token], struct_names: &mut HashSet<String>, enum_names: &mut HashSet<String>) {
    let mut i = 0;
    while i + 1 < tokens.len() {
        match tokens[i].kind {
            TokenKind::Struct if tokens[i + 1].kind == TokenKind::Identifier => {
                struct_names.insert(tokens[i + 1].lexeme.clone());
            }
            TokenKind::Enum if tokens[i + 1].kind == TokenKind::Identifier => {
                enum_names.insert(tokens[i + 1].lexeme.clone());
            }
            _ => {}
        }
        i += 1;
    }
}
