use lukac::compile_source;

#[test]
fn a_function_returning_a_literal_compiles() {
    let module = compile_source("fn main(): s32 { return 0; }", "<test>").expect("should compile");
    assert_eq!(module.functions.len(), 1);
    assert_eq!(module.functions[0].prototype.name, "main");
}

#[test]
fn mismatched_let_binding_is_rejected() {
    let result = compile_source("fn main(): s32 { let x: s32 = \"oops\"; return 0; }", "<test>");
    assert!(result.is_err());
}
