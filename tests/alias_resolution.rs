use lukac::compile_source;

#[test]
fn type_alias_resolves_in_a_function_signature() {
    let src = "type Int = s32; fn id(x: Int): Int { x }";
    let module = compile_source(src, "<test>").expect("should compile");
    let func = &module.functions[0];
    assert_eq!(func.prototype.arg_types[0].base, lukac::types::Base::S32);
    assert_eq!(func.prototype.return_type.base, lukac::types::Base::S32);
}

#[test]
fn unknown_alias_is_a_compile_error() {
    let src = "fn f(x: NotAnAlias): void {}";
    assert!(compile_source(src, "<test>").is_err());
}
