//! The tagged tree spec §3 describes as `AstNode`, plus the small structs
//! each node variant owns. Grounded on
//! `original_source/include/defs.h`'s `t_ast_node_type` union and on the
//! teacher's one-struct-per-node-kind layout (`why_lib`'s
//! `parser/ast/{expression,statement}/*.rs`), collapsed into a single file
//! here since spec's node set is small enough that the split buys nothing.

use crate::lexer::Token;
use crate::types::Type;

/// A tree vertex: its `kind` determines its children: its `token` is the
/// originating token, kept for diagnostics (spec §3).
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub token: Option<Token>,
}

impl Node {
    pub fn new(kind: NodeKind, token: Option<Token>) -> Self {
        Node { kind, token }
    }
}

pub type NodeBox = Box<Node>;

/// A reference occurrence of a variable: `(name, type, mutable)` from
/// spec §3. `type` is `None` until [`crate::ast::fill_types`] resolves it.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub ty: Option<Type>,
    pub mutable: bool,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Variable {
            name: name.into(),
            ty: None,
            mutable: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Minus,
    Plus,
    Deref,
    Ref,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Less,
    Greater,
    Equal,
    NotEqual,
    LessEq,
    GreaterEq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Null,
    True,
    False,
}

/// `(name, arg names[arity], arg types[arity], return type, is_variadic)`
/// from spec §3. The variadic sentinel parameter (if any) is *not*
/// included in `args`/`arg_types` — `is_variadic` alone marks it, and
/// `required_params()` derives the arity contract spec §4.7 needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub name: String,
    pub args: Vec<String>,
    pub arg_types: Vec<Type>,
    pub return_type: Type,
    pub is_variadic: bool,
}

impl Prototype {
    pub fn arity(&self) -> usize {
        self.args.len() + if self.is_variadic { 1 } else { 0 }
    }

    pub fn required_params(&self) -> usize {
        self.arity() - if self.is_variadic { 1 } else { 0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub prototype: Prototype,
    /// Empty body means `extern` (spec §3).
    pub body: Vec<Node>,
}

impl Function {
    pub fn is_extern(&self) -> bool {
        self.body.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: NodeBox,
    pub then_body: Vec<Node>,
    pub else_body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub condition: NodeBox,
    pub body: Vec<Node>,
}

/// `(variable, initializer-expr, is_global)` from spec §3.
#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    pub variable: Variable,
    pub initializer: NodeBox,
    pub is_global: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// Variable (free function), Get (method-style), or Builtin.
    pub callable: NodeBox,
    pub args: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Builtin {
    pub name: String,
    pub args: Vec<Node>,
}

/// `(variable, key, is_enum)` from spec §3 — `Enum::Value` when `is_enum`,
/// else `struct.field`.
#[derive(Debug, Clone, PartialEq)]
pub struct Get {
    pub variable: Variable,
    pub key: String,
    pub is_enum: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDeref {
    pub indexable: Variable,
    pub index: NodeBox,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    pub name: String,
    pub fields: Vec<StructField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructValueField {
    pub name: String,
    pub value: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    pub name: String,
    pub fields: Vec<StructValueField>,
}

/// An enum constant. `value` is the constant expression, either written
/// explicitly (a number literal or a unary-minus over one, per §9 Open
/// Question (c)) or materialized by the parser as one more than the
/// previous field's value, mirroring C enum defaults and
/// `original_source/src/parser.c:1766-1776`'s running counter. Always
/// `Some` once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumField {
    pub name: String,
    pub value: Option<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    pub name: String,
    pub fields: Vec<EnumField>,
}

/// `AstNode` from spec §3: a single variant over the closed set of node
/// kinds. `Number`'s value is stored pre-typed per spec ("the value is
/// stored in a sized cell matching the type's base"); we represent that
/// sized cell as `NumberValue` rather than reinterpreting memory, directly
/// addressing §9 Open Question (b).
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Number(NumberLiteral),
    String(StringLiteral),
    Unary { op: UnaryOp, operand: NodeBox },
    Binary { op: BinaryOp, lhs: NodeBox, rhs: NodeBox },
    Prototype(Prototype),
    Function(Function),
    Return(Option<NodeBox>),
    If(If),
    While(While),
    Cast { expr: NodeBox, target: Type },
    Variable(Variable),
    Let(Let),
    Assignment { lhs: NodeBox, rhs: NodeBox },
    Call(Call),
    ExpressionStmt(NodeBox),
    Break,
    StructDef(StructDef),
    StructValue(StructValue),
    EnumDef(EnumDef),
    Get(Get),
    ArrayDeref(ArrayDeref),
    Literal(LiteralKind),
    ArrayLiteral(Vec<Node>),
    Sizeof(Box<Type>),
    Builtin(Builtin),
    TypeExpr(Type),
}

/// A sized numeric cell, matching one base type's value representation
/// (spec §3, §9 Open Question (b): "pass the concrete numeric variant
/// explicitly rather than reinterpreting memory").
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberValue {
    S8(i8),
    S16(i16),
    S32(i32),
    S64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub ty: Type,
    pub value: NumberValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
}
