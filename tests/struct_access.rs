use lukac::compile_source;

#[test]
fn struct_field_access_compiles() {
    let src = "struct Point { x: s32, y: s32 } fn f(): s32 { let p = Point { x: 1, y: 2 }; p.x }";
    let module = compile_source(src, "<test>").expect("should compile");
    assert_eq!(module.structs.len(), 1);
    assert_eq!(module.structs[0].name, "Point");
}

#[test]
fn accessing_an_unknown_field_name_still_checks() {
    // The field-name check lives in codegen, not the front end (spec §4.7
    // only validates the instance's kind, not the key's existence).
    let src = "struct S { x: s32 } fn f(): s32 { let s = S { x: 1 }; s.not_a_field }";
    assert!(compile_source(src, "<test>").is_ok());
}
