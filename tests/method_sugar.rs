use lukac::compile_source;

#[test]
fn pointer_receiver_method_call_resolves_after_sugar_rewrite() {
    let src = "struct S { x: s32 }\n\
               fn S.m(self: S*, extra: s32): s32 { extra }\n\
               fn f(p: S*): s32 { p.m(1) }";
    let module = compile_source(src, "<test>").expect("should compile");
    let method = module.find_own_function("S.m").expect("S.m should be declared");
    assert_eq!(method.prototype.args, vec!["self".to_string(), "extra".to_string()]);
}

#[test]
fn method_call_on_a_missing_method_is_rejected() {
    let src = "struct S { x: s32 }\n\
               fn f(p: S*): s32 { p.not_declared(1) }";
    assert!(compile_source(src, "<test>").is_err());
}
