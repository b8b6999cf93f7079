use lukac::compile_source;

#[test]
fn mutable_parameter_assignment_compiles() {
    let src = "fn f(x: mut s32): void { x = 1; }";
    assert!(compile_source(src, "<test>").is_ok());
}

#[test]
fn immutable_parameter_assignment_is_rejected() {
    let src = "fn g(x: s32): void { x = 1; }";
    assert!(compile_source(src, "<test>").is_err());
}
