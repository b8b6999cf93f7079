//! `type_of(expr)` (spec §4.4): the small set of node kinds that carry a
//! type directly, plus the `any` fallback for everything else.

use crate::parser::ast::{Node, NodeKind};
use crate::types::{Base, Type};

pub fn type_of(node: &Node) -> Type {
    match &node.kind {
        NodeKind::Number(number) => number.ty.duplicate(),
        NodeKind::Variable(var) => var.ty.clone().unwrap_or_else(|| Type::new(Base::Any)),
        NodeKind::Cast { target, .. } => target.duplicate(),
        NodeKind::String(_) => Type::ptr(Type::new(Base::U8)),
        NodeKind::Return(Some(inner)) => type_of(inner),
        // Not in §4.4's enumerated list, but §8 scenario 3 pins this down
        // explicitly ("`let` without annotation infers `struct P`
        // (nominal)") — a struct literal's name is right there on the
        // node, so falling back to `any` here would make that scenario's
        // own `let` binding untypeable.
        NodeKind::StructValue(sv) => Type::named(Base::Struct, sv.name.clone()),
        _ => Type::new(Base::Any),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{NumberLiteral, NumberValue, StringLiteral, Variable};

    #[test]
    fn number_carries_its_own_type() {
        let node = Node::new(
            NodeKind::Number(NumberLiteral {
                ty: Type::new(Base::S32),
                value: NumberValue::S32(1),
            }),
            None,
        );
        assert_eq!(type_of(&node).base, Base::S32);
    }

    #[test]
    fn string_is_ptr_u8() {
        let node = Node::new(NodeKind::String(StringLiteral { value: "hi".into() }), None);
        let ty = type_of(&node);
        assert_eq!(ty.base, Base::Ptr);
        assert_eq!(ty.inner.unwrap().base, Base::U8);
    }

    #[test]
    fn unannotated_variable_is_any() {
        let node = Node::new(NodeKind::Variable(Variable::new("x")), None);
        assert_eq!(type_of(&node).base, Base::Any);
    }

    #[test]
    fn struct_literal_infers_its_own_nominal_type() {
        use crate::parser::ast::StructValue;
        let node = Node::new(
            NodeKind::StructValue(StructValue {
                name: "Point".into(),
                fields: vec![],
            }),
            None,
        );
        let ty = type_of(&node);
        assert_eq!(ty.base, Base::Struct);
        assert_eq!(ty.payload.as_deref(), Some("Point"));
    }
}
