//! Method-call syntactic sugar rewrite (spec §4.8, the "UTILS layer").
//! Grounded on `original_source/src/utils.c`'s callable-kind dispatch,
//! which already special-cases `AST_TYPE_GET_EXPR` callables ahead of
//! codegen.

use crate::module::Module;
use crate::parser::ast::{Call, Node, NodeKind, Variable};
use crate::types::Base;

/// Rewrites every `instance.method(args)` call whose instance is typed
/// `ptr struct S` into a free call `S.method(instance, args)`, prepending
/// the instance as a fresh argument. Must run after parameter/variable
/// type fill, since it keys off the filled-in variable type.
pub fn rewrite_method_calls(module: &mut Module) {
    for func in &mut module.functions {
        for stmt in &mut func.body {
            rewrite_node(stmt);
        }
    }
}

fn rewrite_node(node: &mut Node) {
    match &mut node.kind {
        NodeKind::Unary { operand, .. } => rewrite_node(operand),
        NodeKind::Binary { lhs, rhs, .. } => {
            rewrite_node(lhs);
            rewrite_node(rhs);
        }
        NodeKind::Return(Some(inner)) => rewrite_node(inner),
        NodeKind::If(if_expr) => {
            rewrite_node(&mut if_expr.condition);
            for s in &mut if_expr.then_body {
                rewrite_node(s);
            }
            for s in &mut if_expr.else_body {
                rewrite_node(s);
            }
        }
        NodeKind::While(while_expr) => {
            rewrite_node(&mut while_expr.condition);
            for s in &mut while_expr.body {
                rewrite_node(s);
            }
        }
        NodeKind::Cast { expr, .. } => rewrite_node(expr),
        NodeKind::Let(let_stmt) => rewrite_node(&mut let_stmt.initializer),
        NodeKind::Assignment { lhs, rhs } => {
            rewrite_node(lhs);
            rewrite_node(rhs);
        }
        NodeKind::Call(call) => {
            rewrite_node(&mut call.callable);
            for arg in &mut call.args {
                rewrite_node(arg);
            }
            rewrite_call(call);
        }
        NodeKind::ExpressionStmt(inner) => rewrite_node(inner),
        NodeKind::StructValue(sv) => {
            for field in &mut sv.fields {
                rewrite_node(&mut field.value);
            }
        }
        NodeKind::ArrayDeref(deref) => rewrite_node(&mut deref.index),
        NodeKind::ArrayLiteral(elements) => {
            for e in elements {
                rewrite_node(e);
            }
        }
        NodeKind::Builtin(builtin) => {
            for arg in &mut builtin.args {
                rewrite_node(arg);
            }
        }
        _ => {}
    }
}

fn rewrite_call(call: &mut Call) {
    let NodeKind::Get(get) = &call.callable.kind else {
        return;
    };
    if get.is_enum {
        return;
    }
    let Some(ty) = &get.variable.ty else {
        return;
    };
    if ty.base != Base::Ptr {
        return;
    }
    let Some(inner) = &ty.inner else {
        return;
    };
    if inner.base != Base::Struct {
        return;
    }

    let struct_name = inner.payload.clone().unwrap_or_default();
    let new_name = format!("{struct_name}.{}", get.key);
    let instance = get.variable.clone();
    let token = call.callable.token.clone();

    let mut new_args = Vec::with_capacity(call.args.len() + 1);
    new_args.push(Node::new(NodeKind::Variable(instance), token.clone()));
    new_args.append(&mut call.args);
    call.args = new_args;
    call.callable = Box::new(Node::new(NodeKind::Variable(Variable::new(new_name)), token));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::Parser;
    use crate::types::Type;

    fn parse(src: &str) -> Module {
        let tokens = lex(src, "<test>").unwrap();
        Parser::new(tokens, "<test>").parse_module().unwrap()
    }

    #[test]
    fn method_call_rewrites_to_free_call_with_prepended_receiver() {
        let mut module = parse("struct S { x: s32 } fn f(): s32 { p.m(1) }");
        // simulate type-fill having already run.
        if let NodeKind::ExpressionStmt(inner) = &mut module.functions[0].body[0].kind {
            if let NodeKind::Call(call) = &mut inner.kind {
                if let NodeKind::Get(get) = &mut call.callable.kind {
                    get.variable.ty = Some(Type::ptr(Type::named(crate::types::Base::Struct, "S")));
                }
            }
        }

        rewrite_method_calls(&mut module);

        let NodeKind::ExpressionStmt(inner) = &module.functions[0].body[0].kind else {
            panic!("expected expression statement");
        };
        let NodeKind::Call(call) = &inner.kind else {
            panic!("expected call");
        };
        let NodeKind::Variable(callee) = &call.callable.kind else {
            panic!("expected rewritten callable to be a plain variable");
        };
        assert_eq!(callee.name, "S.m");
        assert_eq!(call.args.len(), 2);
        match &call.args[0].kind {
            NodeKind::Variable(receiver) => assert_eq!(receiver.name, "p"),
            other => panic!("expected receiver variable, got {other:?}"),
        }

        // Reversing: popping the first arg restores the original `m` call shape.
        let mut args = call.args.clone();
        args.remove(0);
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn untyped_get_callable_is_left_alone() {
        let mut module = parse("fn f(): s32 { p.m(1) }");
        rewrite_method_calls(&mut module);
        let NodeKind::ExpressionStmt(inner) = &module.functions[0].body[0].kind else {
            panic!("expected expression statement");
        };
        let NodeKind::Call(call) = &inner.kind else {
            panic!("expected call");
        };
        assert!(matches!(call.callable.kind, NodeKind::Get(_)));
    }
}
