//! Full type checking (spec §4.7). Grounded on why_lib's
//! `typechecker::context`-driven recursive descent and
//! `original_source/src/type_checker.c`'s per-node-kind `check_expr` switch.

mod error;

pub use error::TypeCheckError;

use crate::ast::type_of;
use crate::core;
use crate::module::Module;
use crate::parser::ast::{Call, Function, Get, Node, NodeKind, Prototype};
use crate::types::Base;

type TResult<T> = Result<T, TypeCheckError>;

/// Checks every function in `module`, statement by statement, stopping at
/// the first failure (spec §7's fatal-on-first-error propagation policy).
pub fn check_module(module: &Module) -> TResult<()> {
    for func in &module.functions {
        check_function(module, func)?;
    }
    Ok(())
}

fn check_function(module: &Module, func: &Function) -> TResult<()> {
    for stmt in &func.body {
        check_node(module, stmt)?;
    }
    Ok(())
}

fn check_node(module: &Module, node: &Node) -> TResult<()> {
    match &node.kind {
        NodeKind::ExpressionStmt(inner) => check_node(module, inner),

        NodeKind::Let(let_stmt) => {
            check_node(module, &let_stmt.initializer)?;
            let declared = type_of_declared(let_stmt);
            let actual = type_of(&let_stmt.initializer);
            if !declared.equal(&actual) {
                return Err(TypeCheckError::at(
                    node.token.as_ref(),
                    format!(
                        "let binding '{}' declared as {declared} but initializer has type {actual}",
                        let_stmt.variable.name
                    ),
                ));
            }
            Ok(())
        }

        NodeKind::Assignment { lhs, rhs } => {
            check_node(module, rhs)?;
            check_node(module, lhs)?;
            let lhs_ty = type_of(lhs);
            let rhs_ty = type_of(rhs);
            if !lhs_ty.equal(&rhs_ty) {
                return Err(TypeCheckError::at(
                    node.token.as_ref(),
                    format!("cannot assign a value of type {rhs_ty} to a target of type {lhs_ty}"),
                ));
            }
            if !lhs_ty.mutable {
                return Err(TypeCheckError::at(
                    node.token.as_ref(),
                    format!("assignment target of type {lhs_ty} is not mutable"),
                ));
            }
            Ok(())
        }

        NodeKind::Binary { lhs, rhs, .. } => {
            check_node(module, lhs)?;
            check_node(module, rhs)?;
            let lhs_ty = type_of(lhs);
            let rhs_ty = type_of(rhs);
            if !lhs_ty.equal(&rhs_ty) {
                return Err(TypeCheckError::at(
                    node.token.as_ref(),
                    format!("binary operands disagree in type: {lhs_ty} vs {rhs_ty}"),
                ));
            }
            Ok(())
        }

        NodeKind::Get(get) => check_get(node, get),

        NodeKind::Call(call) => check_call(module, node, call),

        NodeKind::If(if_expr) => {
            check_node(module, &if_expr.condition)?;
            for stmt in &if_expr.then_body {
                check_node(module, stmt)?;
            }
            for stmt in &if_expr.else_body {
                check_node(module, stmt)?;
            }
            Ok(())
        }

        NodeKind::While(while_expr) => {
            check_node(module, &while_expr.condition)?;
            for stmt in &while_expr.body {
                check_node(module, stmt)?;
            }
            Ok(())
        }

        NodeKind::Unary { operand, .. } => check_node(module, operand),
        NodeKind::Cast { expr, .. } => check_node(module, expr),
        NodeKind::Return(Some(inner)) => check_node(module, inner),
        NodeKind::ArrayDeref(deref) => check_node(module, &deref.index),

        NodeKind::ArrayLiteral(elements) => {
            for e in elements {
                check_node(module, e)?;
            }
            Ok(())
        }

        NodeKind::StructValue(sv) => {
            for field in &sv.fields {
                check_node(module, &field.value)?;
            }
            Ok(())
        }

        NodeKind::Builtin(builtin) => {
            for arg in &builtin.args {
                check_node(module, arg)?;
            }
            Ok(())
        }

        _ => Ok(()),
    }
}

fn type_of_declared(let_stmt: &crate::parser::ast::Let) -> crate::types::Type {
    let_stmt
        .variable
        .ty
        .clone()
        .unwrap_or_else(|| crate::types::Type::new(Base::Any))
}

/// Two-step validation mirroring the original's `check_expr` on get
/// expressions (spec §11): absent type and kind mismatch are distinct
/// failures, not folded into one.
fn check_get(node: &Node, get: &Get) -> TResult<()> {
    let Some(ty) = &get.variable.ty else {
        return Err(TypeCheckError::at(
            node.token.as_ref(),
            format!("cannot resolve the type of '{}' for this get-expression", get.variable.name),
        ));
    };

    let expected = if get.is_enum { Base::Enum } else { Base::Struct };
    if ty.base != expected {
        return Err(TypeCheckError::at(
            node.token.as_ref(),
            format!(
                "'{}' has type {ty}, which is not {}",
                get.variable.name,
                if get.is_enum { "an enum" } else { "a struct" }
            ),
        ));
    }
    Ok(())
}

fn check_call(module: &Module, node: &Node, call: &Call) -> TResult<()> {
    for arg in &call.args {
        check_node(module, arg)?;
    }

    let Some(prototype) = resolve_callable(module, &call.callable) else {
        return Err(TypeCheckError::at(node.token.as_ref(), "call to an unresolved function"));
    };

    let required = prototype.required_params();
    if prototype.is_variadic {
        if call.args.len() < required {
            return Err(TypeCheckError::at(
                node.token.as_ref(),
                format!(
                    "call to '{}' needs at least {required} argument(s), got {}",
                    prototype.name,
                    call.args.len()
                ),
            ));
        }
    } else if call.args.len() != required {
        return Err(TypeCheckError::at(
            node.token.as_ref(),
            format!(
                "call to '{}' needs exactly {required} argument(s), got {}",
                prototype.name,
                call.args.len()
            ),
        ));
    }

    for i in 0..required {
        let declared = &prototype.arg_types[i];
        let actual = type_of(&call.args[i]);
        if !declared.equal(&actual) {
            return Err(TypeCheckError::at(
                node.token.as_ref(),
                format!(
                    "argument {} to '{}' has type {actual} but {declared} was expected",
                    i + 1,
                    prototype.name
                ),
            ));
        }
        if declared.mutable && !actual.mutable {
            return Err(TypeCheckError::at(
                node.token.as_ref(),
                format!("argument {} to '{}' must be mutable", i + 1, prototype.name),
            ));
        }
    }

    Ok(())
}

fn resolve_callable<'a>(module: &'a Module, callable: &Node) -> Option<&'a Prototype> {
    match &callable.kind {
        NodeKind::Variable(var) => {
            if let Some(proto) = core::lookup_builtin(&var.name) {
                return Some(proto);
            }
            module.resolve_function(&var.name).map(|f| &f.prototype)
        }
        NodeKind::Builtin(builtin) => core::lookup_builtin(&builtin.name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{fill_types, promote_tail_expressions};
    use crate::lexer::lex;
    use crate::parser::Parser;

    fn build(src: &str) -> Module {
        let tokens = lex(src, "<test>").unwrap();
        let mut module = Parser::new(tokens, "<test>").parse_module().unwrap();
        fill_types(&mut module);
        promote_tail_expressions(&mut module);
        module
    }

    #[test]
    fn return_literal_checks() {
        let module = build("fn main(): s32 { return 0; }");
        assert!(check_module(&module).is_ok());
    }

    #[test]
    fn identity_function_checks() {
        let module = build("fn id(x: s32): s32 { x }");
        assert!(check_module(&module).is_ok());
    }

    #[test]
    fn struct_field_access_checks() {
        let module = build("struct P { x: s32, y: s32 } fn f(): s32 { let p = P { x: 1, y: 2 }; p.x }");
        assert!(check_module(&module).is_ok());
    }

    #[test]
    fn enum_value_checks() {
        let module = build("enum E { A, B = 5, C } fn f(): s32 { E::C }");
        assert!(check_module(&module).is_ok());
    }

    #[test]
    fn variadic_call_accepts_extra_args() {
        let module = build(
            "extern fn printf(fmt: string, ...): s32; fn f(): s32 { printf(\"%d %d\\n\", 1, 2) }",
        );
        assert!(check_module(&module).is_ok());
    }

    #[test]
    fn mutable_parameter_assignment_checks() {
        let module = build("fn f(x: mut s32): void { x = 1; }");
        assert!(check_module(&module).is_ok());
    }

    #[test]
    fn immutable_parameter_assignment_fails() {
        let module = build("fn g(x: s32): void { x = 1; }");
        assert!(check_module(&module).is_err());
    }

    #[test]
    fn binary_operand_mismatch_fails() {
        let module = build("fn f(): void { let x = 1; let y = \"s\"; x == y; }");
        assert!(check_module(&module).is_err());
    }
}
