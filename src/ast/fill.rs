//! Parameter-type fill and variable-type fill (spec §4.3). Grounded on
//! `original_source/src/ast.c`'s `AST_fix_function_param_types`/
//! `AST_fix_function_variable_types` pair of tree walks.

use std::collections::{HashMap, HashSet};

use super::infer::type_of;
use crate::module::Module;
use crate::parser::ast::{Function, Get, Node, NodeKind, Variable};
use crate::types::{Base, Type};

/// Runs both fill passes over every function in `module`: first each
/// parameter's declared type over references to it, then each `let`
/// binding's (declared-or-inferred) type over references to it, threaded
/// through nested `if`/`while` scopes. A get-expression's `variable` is
/// filled alongside ordinary variable references in both passes, since a
/// method-call receiver or struct-field instance is just a reference that
/// happens to live inside a `Get` rather than bare in the tree.
pub fn fill_types(module: &mut Module) {
    let enums: HashSet<String> = module.enums.iter().map(|e| e.name.clone()).collect();

    for func in &mut module.functions {
        fill_parameter_types(func, &enums);
    }
    for func in &mut module.functions {
        let mut scopes: Vec<HashMap<String, Type>> = vec![HashMap::new()];
        fill_variable_types_in_block(&mut func.body, &mut scopes, &enums);
    }
}

fn needs_fill(ty: &Option<Type>) -> bool {
    match ty {
        None => true,
        Some(t) => t.base == Base::Any,
    }
}

/// Fills `var.ty` from `candidate`, preserving a prior `true` mutable
/// annotation on the reference site that the candidate itself lacks (spec
/// §4.3's parenthetical).
fn apply_fill(var: &mut Variable, candidate: &Type) {
    let mut filled = candidate.duplicate();
    if var.mutable && !filled.mutable {
        filled.mutable = true;
    }
    var.ty = Some(filled);
}

/// Fills a get-expression's own `variable` slot: the enum's nominal type
/// when `is_enum` (there the "variable" is really the enum's own name,
/// e.g. `E` in `E::A`), otherwise whatever `lookup` (a parameter or scope
/// lookup) resolves the instance name to.
fn fill_get_variable(get: &mut Get, enums: &HashSet<String>, lookup: impl FnOnce(&str) -> Option<Type>) {
    if !needs_fill(&get.variable.ty) {
        return;
    }
    if get.is_enum {
        if enums.contains(&get.variable.name) {
            get.variable.ty = Some(Type::named(Base::Enum, get.variable.name.clone()));
        }
    } else if let Some(ty) = lookup(&get.variable.name) {
        apply_fill(&mut get.variable, &ty);
    }
}

fn fill_parameter_types(func: &mut Function, enums: &HashSet<String>) {
    let params: Vec<(String, Type)> = func
        .prototype
        .args
        .iter()
        .cloned()
        .zip(func.prototype.arg_types.iter().cloned())
        .collect();

    for stmt in &mut func.body {
        fill_parameter_refs(stmt, &params, enums);
    }
}

fn fill_parameter_refs(node: &mut Node, params: &[(String, Type)], enums: &HashSet<String>) {
    match &mut node.kind {
        NodeKind::Variable(var) => {
            if needs_fill(&var.ty) {
                if let Some((_, ty)) = params.iter().find(|(name, _)| *name == var.name) {
                    apply_fill(var, ty);
                }
            }
        }
        NodeKind::Get(get) => {
            fill_get_variable(get, enums, |name| {
                params.iter().find(|(n, _)| n == name).map(|(_, ty)| ty.clone())
            });
        }
        _ => for_each_child(node, |child| fill_parameter_refs(child, params, enums)),
    }
}

fn fill_variable_types_in_block(body: &mut Vec<Node>, scopes: &mut Vec<HashMap<String, Type>>, enums: &HashSet<String>) {
    scopes.push(HashMap::new());
    for stmt in body.iter_mut() {
        fill_variable_types_in_node(stmt, scopes, enums);
    }
    scopes.pop();
}

fn lookup_scope<'a>(scopes: &'a [HashMap<String, Type>], name: &str) -> Option<&'a Type> {
    scopes.iter().rev().find_map(|scope| scope.get(name))
}

fn fill_variable_types_in_node(node: &mut Node, scopes: &mut Vec<HashMap<String, Type>>, enums: &HashSet<String>) {
    match &mut node.kind {
        NodeKind::Let(let_stmt) => {
            fill_variable_types_in_node(&mut let_stmt.initializer, scopes, enums);

            let resolved = if needs_fill(&let_stmt.variable.ty) {
                type_of(&let_stmt.initializer)
            } else {
                let_stmt.variable.ty.clone().expect("needs_fill is false")
            };

            let mut final_ty = resolved;
            if let_stmt.variable.mutable && !final_ty.mutable {
                final_ty.mutable = true;
            }
            let_stmt.variable.ty = Some(final_ty.clone());
            scopes
                .last_mut()
                .expect("fill_variable_types_in_block always pushes a scope")
                .insert(let_stmt.variable.name.clone(), final_ty);
        }
        NodeKind::Variable(var) => {
            if needs_fill(&var.ty) {
                if let Some(ty) = lookup_scope(scopes, &var.name) {
                    apply_fill(var, &ty.duplicate());
                }
            }
        }
        NodeKind::Get(get) => {
            fill_get_variable(get, enums, |name| lookup_scope(scopes, name).map(|t| t.duplicate()));
        }
        NodeKind::If(if_expr) => {
            fill_variable_types_in_node(&mut if_expr.condition, scopes, enums);
            fill_variable_types_in_block(&mut if_expr.then_body, scopes, enums);
            fill_variable_types_in_block(&mut if_expr.else_body, scopes, enums);
        }
        NodeKind::While(while_expr) => {
            fill_variable_types_in_node(&mut while_expr.condition, scopes, enums);
            fill_variable_types_in_block(&mut while_expr.body, scopes, enums);
        }
        _ => {
            for_each_child(node, |child| fill_variable_types_in_node(child, scopes, enums));
        }
    }
}

/// Visits every direct expression child of `node`, skipping the kinds the
/// two fill passes special-case themselves (`Let`, `If`, `While`,
/// `Variable`, `Get`).
fn for_each_child(node: &mut Node, mut visit: impl FnMut(&mut Node)) {
    match &mut node.kind {
        NodeKind::Unary { operand, .. } => visit(operand),
        NodeKind::Binary { lhs, rhs, .. } => {
            visit(lhs);
            visit(rhs);
        }
        NodeKind::Return(Some(inner)) => visit(inner),
        NodeKind::Cast { expr, .. } => visit(expr),
        NodeKind::Let(let_stmt) => visit(&mut let_stmt.initializer),
        NodeKind::Assignment { lhs, rhs } => {
            visit(lhs);
            visit(rhs);
        }
        NodeKind::Call(call) => {
            visit(&mut call.callable);
            for arg in &mut call.args {
                visit(arg);
            }
        }
        NodeKind::ExpressionStmt(inner) => visit(inner),
        NodeKind::If(if_expr) => {
            visit(&mut if_expr.condition);
            for stmt in &mut if_expr.then_body {
                visit(stmt);
            }
            for stmt in &mut if_expr.else_body {
                visit(stmt);
            }
        }
        NodeKind::While(while_expr) => {
            visit(&mut while_expr.condition);
            for stmt in &mut while_expr.body {
                visit(stmt);
            }
        }
        NodeKind::StructValue(sv) => {
            for field in &mut sv.fields {
                visit(&mut field.value);
            }
        }
        NodeKind::ArrayDeref(deref) => visit(&mut deref.index),
        NodeKind::ArrayLiteral(elements) => {
            for e in elements {
                visit(e);
            }
        }
        NodeKind::Builtin(builtin) => {
            for arg in &mut builtin.args {
                visit(arg);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::Parser;

    fn parse(src: &str) -> Module {
        let tokens = lex(src, "<test>").unwrap();
        Parser::new(tokens, "<test>").parse_module().unwrap()
    }

    #[test]
    fn parameter_reference_is_filled() {
        let mut module = parse("fn id(x: s32): s32 { x }");
        fill_types(&mut module);
        let func = &module.functions[0];
        match &func.body[0].kind {
            NodeKind::ExpressionStmt(inner) => match &inner.kind {
                NodeKind::Variable(var) => assert_eq!(var.ty.as_ref().unwrap().base, Base::S32),
                other => panic!("expected variable, got {other:?}"),
            },
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn let_binding_infers_from_initializer() {
        let mut module = parse("fn f(): s32 { let x = 1; x }");
        fill_types(&mut module);
        let func = &module.functions[0];
        match &func.body[1].kind {
            NodeKind::ExpressionStmt(inner) => match &inner.kind {
                NodeKind::Variable(var) => assert_eq!(var.ty.as_ref().unwrap().base, Base::S32),
                other => panic!("expected variable, got {other:?}"),
            },
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn let_binding_visible_inside_nested_if() {
        let mut module = parse("fn f(): s32 { let x = 1; if true { x } 0; }");
        fill_types(&mut module);
        let func = &module.functions[0];
        match &func.body[1].kind {
            NodeKind::ExpressionStmt(inner) => match &inner.kind {
                NodeKind::If(if_expr) => match &if_expr.then_body[0].kind {
                    NodeKind::ExpressionStmt(inner) => match &inner.kind {
                        NodeKind::Variable(var) => assert_eq!(var.ty.as_ref().unwrap().base, Base::S32),
                        other => panic!("expected variable, got {other:?}"),
                    },
                    other => panic!("expected expression statement, got {other:?}"),
                },
                other => panic!("expected if, got {other:?}"),
            },
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn struct_instance_get_is_filled_to_its_nominal_type() {
        let mut module = parse("struct P { x: s32 } fn f(): s32 { let p = P { x: 1 }; p.x }");
        fill_types(&mut module);
        let func = &module.functions[0];
        match &func.body[1].kind {
            NodeKind::ExpressionStmt(inner) => match &inner.kind {
                NodeKind::Get(get) => {
                    let ty = get.variable.ty.as_ref().expect("get's variable should be filled");
                    assert_eq!(ty.base, Base::Struct);
                    assert_eq!(ty.payload.as_deref(), Some("P"));
                }
                other => panic!("expected get, got {other:?}"),
            },
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn enum_get_is_filled_to_the_enum_type_by_name() {
        let mut module = parse("enum E { A, B } fn f(): s32 { E::A }");
        fill_types(&mut module);
        let func = &module.functions[0];
        match &func.body[0].kind {
            NodeKind::ExpressionStmt(inner) => match &inner.kind {
                NodeKind::Get(get) => {
                    let ty = get.variable.ty.as_ref().expect("get's variable should be filled");
                    assert_eq!(ty.base, Base::Enum);
                    assert_eq!(ty.payload.as_deref(), Some("E"));
                }
                other => panic!("expected get, got {other:?}"),
            },
            other => panic!("expected expression statement, got {other:?}"),
        }
    }
}
