use lukac::compile_source;
use lukac::parser::ast::{NodeKind, NumberLiteral, NumberValue};

fn s32_value(node: &lukac::parser::ast::Node) -> i32 {
    match &node.kind {
        NodeKind::Number(NumberLiteral { value: NumberValue::S32(v), .. }) => *v,
        other => panic!("expected an s32 number literal, got {other:?}"),
    }
}

#[test]
fn enum_values_default_and_explicit_assignment() {
    let src = "enum E { A, B = 5, C } fn f(): s32 { E::C }";
    let module = compile_source(src, "<test>").expect("should compile");
    let e = &module.enums[0];
    assert_eq!(e.fields[0].name, "A");
    assert_eq!(e.fields[1].name, "B");
    assert_eq!(e.fields[2].name, "C");
    assert_eq!(s32_value(e.fields[0].value.as_ref().expect("A should have a value")), 0);
    assert_eq!(s32_value(e.fields[1].value.as_ref().expect("B should have a value")), 5);
    assert_eq!(s32_value(e.fields[2].value.as_ref().expect("C should have a value")), 6);
}

#[test]
fn enum_get_on_an_unknown_enum_name_fails() {
    let src = "fn f(): s32 { Unknown::C }";
    assert!(compile_source(src, "<test>").is_err());
}
