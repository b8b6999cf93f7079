use lukac::compile_source;

#[test]
fn variadic_printf_call_accepts_extra_untyped_args() {
    let src = "extern fn printf(fmt: string, ...): s32; fn f(): s32 { printf(\"%d %d\\n\", 1, 2) }";
    let module = compile_source(src, "<test>").expect("should compile");
    let printf = module.find_own_function("printf").expect("printf should be declared");
    assert!(printf.prototype.is_variadic);
    assert_eq!(printf.prototype.required_params(), 1);
}

#[test]
fn variadic_call_below_required_arity_is_rejected() {
    let src = "extern fn printf(fmt: string, ...): s32; fn f(): s32 { printf() }";
    assert!(compile_source(src, "<test>").is_err());
}
