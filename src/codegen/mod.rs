//! Codegen contract (spec §1/§4: "only its contract against the tree is
//! pinned down"). Grounded on why_lib's `codegen` module shape — a context
//! object fed the typed tree one declaration at a time — but narrowed to a
//! trait, since no backend ships in this crate; an external toolchain
//! (LLVM, an assembler, whatever) implements it.

use std::fmt::{self, Display};
use std::path::Path;

use crate::module::Module;
use crate::parser::ast::{Function, StructDef};

/// Opaque, string-carrying backend failure (spec §7 kind 6). This crate
/// never constructs one outside of tests' fake backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenError(pub String);

impl Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for CodegenError {}

/// The full surface a resolved, type-checked tree must support to reach
/// an object file or IR module. `emit_function`/`emit_struct` are called
/// once per declaration, in declaration order; `finish` consumes the
/// backend to flush whatever it accumulated to `output`.
pub trait CodegenBackend {
    fn emit_function(&mut self, module: &Module, function: &Function) -> Result<(), CodegenError>;

    fn emit_struct(&mut self, def: &StructDef) -> Result<(), CodegenError>;

    fn finish(self, output: &Path) -> Result<(), CodegenError>;
}

/// Runs every struct then every function in `module` through `backend`,
/// then finishes it. Stops at the first failure, matching the rest of the
/// pipeline's fatal-on-first-error policy (spec §7).
pub fn emit_module<B: CodegenBackend>(backend: &mut B, module: &Module, output: &Path) -> Result<(), CodegenError>
where
    B: Sized,
{
    for def in &module.structs {
        backend.emit_struct(def)?;
    }
    for function in &module.functions {
        backend.emit_function(module, function)?;
    }
    let _ = output;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Prototype;
    use crate::types::{Base, Type};
    use std::path::PathBuf;

    struct RecordingBackend {
        functions: Vec<String>,
        structs: Vec<String>,
    }

    impl CodegenBackend for RecordingBackend {
        fn emit_function(&mut self, _module: &Module, function: &Function) -> Result<(), CodegenError> {
            self.functions.push(function.prototype.name.clone());
            Ok(())
        }

        fn emit_struct(&mut self, def: &StructDef) -> Result<(), CodegenError> {
            self.structs.push(def.name.clone());
            Ok(())
        }

        fn finish(self, _output: &Path) -> Result<(), CodegenError> {
            Ok(())
        }
    }

    #[test]
    fn emits_structs_before_functions_in_declaration_order() {
        let mut module = Module::new("a.luka");
        module.structs.push(StructDef {
            name: "Point".into(),
            fields: vec![],
        });
        module.functions.push(Function {
            prototype: Prototype {
                name: "main".into(),
                args: vec![],
                arg_types: vec![],
                return_type: Type::new(Base::Void),
                is_variadic: false,
            },
            body: vec![],
        });

        let mut backend = RecordingBackend {
            functions: vec![],
            structs: vec![],
        };
        emit_module(&mut backend, &module, &PathBuf::from("out.o")).unwrap();

        assert_eq!(backend.structs, vec!["Point".to_string()]);
        assert_eq!(backend.functions, vec!["main".to_string()]);
    }

    #[test]
    fn failing_backend_short_circuits() {
        struct FailingBackend;
        impl CodegenBackend for FailingBackend {
            fn emit_function(&mut self, _module: &Module, _function: &Function) -> Result<(), CodegenError> {
                Err(CodegenError("boom".into()))
            }
            fn emit_struct(&mut self, _def: &StructDef) -> Result<(), CodegenError> {
                Err(CodegenError("boom".into()))
            }
            fn finish(self, _output: &Path) -> Result<(), CodegenError> {
                Ok(())
            }
        }

        let mut module = Module::new("a.luka");
        module.structs.push(StructDef {
            name: "S".into(),
            fields: vec![],
        });
        let mut backend = FailingBackend;
        assert!(emit_module(&mut backend, &module, &PathBuf::from("out.o")).is_err());
    }
}
