//! Tree traversal helpers that run between parsing and type checking
//! (spec §4.3): type-alias resolution, parameter/variable type fill,
//! last-expression promotion, and the method-call sugar rewrite (§4.8).
//!
//! The tagged tree itself ([`crate::parser::ast`]) lives under the parser
//! module since it is the parser's output type; this module only holds
//! the passes that mutate it afterward.

mod alias;
mod fill;
mod infer;
mod promote;
mod sugar;

pub use alias::{resolve_aliases, AliasError};
pub use fill::fill_types;
pub use infer::type_of;
pub use promote::promote_tail_expressions;
pub use sugar::rewrite_method_calls;
