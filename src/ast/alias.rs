//! Type-alias resolution (spec §4.3). Aliases have no analogue in
//! `original_source` (a spec addition); this walks every type a node
//! directly owns and replaces `alias` bases with a duplicate of their
//! resolved target, mirroring the same walk-and-replace shape as
//! `ast/fill.rs`.

use std::collections::HashMap;
use std::fmt::{self, Display};

use crate::module::Module;
use crate::parser::ast::{Node, NodeKind};
use crate::parser::TypeAlias;
use crate::types::{Base, Type};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasError {
    pub name: String,
}

impl Display for AliasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown type alias '{}'", self.name)
    }
}

impl std::error::Error for AliasError {}

/// Resolves every `alias`-based [`Type`] reachable from `module` against
/// `aliases`, in place. An alias naming another alias resolves
/// transitively; an alias with no entry in the table is fatal (spec §4.3).
pub fn resolve_aliases(module: &mut Module, aliases: &[TypeAlias]) -> Result<(), AliasError> {
    let table: HashMap<String, Type> = aliases.iter().map(|a| (a.name.clone(), a.ty.duplicate())).collect();

    for func in &mut module.functions {
        for arg_ty in &mut func.prototype.arg_types {
            resolve_type(arg_ty, &table)?;
        }
        resolve_type(&mut func.prototype.return_type, &table)?;
        for stmt in &mut func.body {
            resolve_node(stmt, &table)?;
        }
    }

    for s in &mut module.structs {
        for field in &mut s.fields {
            resolve_type(&mut field.ty, &table)?;
        }
    }

    for v in &mut module.variables {
        if let Some(ty) = &mut v.variable.ty {
            resolve_type(ty, &table)?;
        }
        resolve_node(&mut v.initializer, &table)?;
    }

    Ok(())
}

/// Replaces `ty` in place if it is (transitively) an alias; recurses into
/// `inner` so `alias*`/`alias[]` chains resolve too.
fn resolve_type(ty: &mut Type, table: &HashMap<String, Type>) -> Result<(), AliasError> {
    while ty.base == Base::Alias {
        let name = ty.payload.clone().unwrap_or_default();
        let Some(target) = table.get(&name) else {
            return Err(AliasError { name });
        };
        let mutable = ty.mutable;
        *ty = target.duplicate();
        ty.mutable = ty.mutable || mutable;
    }

    if let Some(inner) = &mut ty.inner {
        resolve_type(inner, table)?;
    }

    Ok(())
}

fn resolve_node(node: &mut Node, table: &HashMap<String, Type>) -> Result<(), AliasError> {
    match &mut node.kind {
        NodeKind::Number(_) | NodeKind::String(_) | NodeKind::Break | NodeKind::Literal(_) => Ok(()),
        NodeKind::Unary { operand, .. } => resolve_node(operand, table),
        NodeKind::Binary { lhs, rhs, .. } => {
            resolve_node(lhs, table)?;
            resolve_node(rhs, table)
        }
        NodeKind::Prototype(proto) => {
            for arg_ty in &mut proto.arg_types {
                resolve_type(arg_ty, table)?;
            }
            resolve_type(&mut proto.return_type, table)
        }
        NodeKind::Function(func) => {
            for arg_ty in &mut func.prototype.arg_types {
                resolve_type(arg_ty, table)?;
            }
            resolve_type(&mut func.prototype.return_type, table)?;
            for stmt in &mut func.body {
                resolve_node(stmt, table)?;
            }
            Ok(())
        }
        NodeKind::Return(inner) => match inner {
            Some(n) => resolve_node(n, table),
            None => Ok(()),
        },
        NodeKind::If(if_expr) => {
            resolve_node(&mut if_expr.condition, table)?;
            for stmt in &mut if_expr.then_body {
                resolve_node(stmt, table)?;
            }
            for stmt in &mut if_expr.else_body {
                resolve_node(stmt, table)?;
            }
            Ok(())
        }
        NodeKind::While(while_expr) => {
            resolve_node(&mut while_expr.condition, table)?;
            for stmt in &mut while_expr.body {
                resolve_node(stmt, table)?;
            }
            Ok(())
        }
        NodeKind::Cast { expr, target } => {
            resolve_node(expr, table)?;
            resolve_type(target, table)
        }
        NodeKind::Variable(var) => match &mut var.ty {
            Some(ty) => resolve_type(ty, table),
            None => Ok(()),
        },
        NodeKind::Let(let_stmt) => {
            if let Some(ty) = &mut let_stmt.variable.ty {
                resolve_type(ty, table)?;
            }
            resolve_node(&mut let_stmt.initializer, table)
        }
        NodeKind::Assignment { lhs, rhs } => {
            resolve_node(lhs, table)?;
            resolve_node(rhs, table)
        }
        NodeKind::Call(call) => {
            resolve_node(&mut call.callable, table)?;
            for arg in &mut call.args {
                resolve_node(arg, table)?;
            }
            Ok(())
        }
        NodeKind::ExpressionStmt(inner) => resolve_node(inner, table),
        NodeKind::StructDef(def) => {
            for field in &mut def.fields {
                resolve_type(&mut field.ty, table)?;
            }
            Ok(())
        }
        NodeKind::StructValue(value) => {
            for field in &mut value.fields {
                resolve_node(&mut field.value, table)?;
            }
            Ok(())
        }
        NodeKind::EnumDef(def) => {
            for field in &mut def.fields {
                if let Some(value) = &mut field.value {
                    resolve_node(value, table)?;
                }
            }
            Ok(())
        }
        NodeKind::Get(_) => Ok(()),
        NodeKind::ArrayDeref(deref) => resolve_node(&mut deref.index, table),
        NodeKind::ArrayLiteral(elements) => {
            for e in elements {
                resolve_node(e, table)?;
            }
            Ok(())
        }
        NodeKind::Sizeof(target) => resolve_type(target, table),
        NodeKind::Builtin(builtin) => {
            for arg in &mut builtin.args {
                resolve_node(arg, table)?;
            }
            Ok(())
        }
        NodeKind::TypeExpr(ty) => resolve_type(ty, table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::Parser;

    fn parse(src: &str) -> (Module, Vec<TypeAlias>) {
        let tokens = lex(src, "<test>").unwrap();
        let mut parser = Parser::new(tokens, "<test>");
        let module = parser.parse_module().unwrap();
        (module, parser.aliases().to_vec())
    }

    #[test]
    fn alias_resolution_reaches_fixed_point() {
        let (mut module, aliases) = parse("type myint = s32; fn f(x: myint): myint { x }");
        resolve_aliases(&mut module, &aliases).unwrap();
        let proto = &module.functions[0].prototype;
        assert_eq!(proto.arg_types[0].base, Base::S32);
        assert_eq!(proto.return_type.base, Base::S32);
    }

    #[test]
    fn chained_aliases_resolve_transitively() {
        let (mut module, aliases) = parse("type a = s32; type b = a; fn f(): b { 0 }");
        resolve_aliases(&mut module, &aliases).unwrap();
        assert_eq!(module.functions[0].prototype.return_type.base, Base::S32);
    }

    #[test]
    fn unknown_alias_is_fatal() {
        let (mut module, aliases) = parse("fn f(): doesnotexist { 0 }");
        assert!(resolve_aliases(&mut module, &aliases).is_err());
    }

    #[test]
    fn pointer_to_alias_resolves_through_inner() {
        let (mut module, aliases) = parse("type myint = s32; fn f(x: myint*): void { }");
        resolve_aliases(&mut module, &aliases).unwrap();
        let arg = &module.functions[0].prototype.arg_types[0];
        assert_eq!(arg.base, Base::Ptr);
        assert_eq!(arg.inner.as_ref().unwrap().base, Base::S32);
    }
}
