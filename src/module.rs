//! Per-file compilation unit and cross-module function resolution (spec
//! §3 `Module`, §4.6 `Module resolver`). Grounded on
//! `original_source/include/lib.h`'s `t_module` plus `LIB_resolve_func_name`,
//! which the teacher's own `typechecker::context`/`scope` modules don't
//! have an analogue for (why_lib is single-file-per-compilation and has no
//! import system) — this module is grounded directly on the original C
//! source instead.

use std::collections::HashSet;

use crate::parser::ast::{EnumDef, Function, Let, StructDef};

/// `{ file_path, enums, functions, structs, variables, import_paths,
/// imports }` from spec §3. `imports` holds fully parsed+linked
/// sub-modules; `import_paths` keeps the original textual import specs
/// around for diagnostics and re-resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub file_path: String,
    pub enums: Vec<EnumDef>,
    pub functions: Vec<Function>,
    pub structs: Vec<StructDef>,
    pub variables: Vec<Let>,
    pub import_paths: Vec<String>,
    pub imports: Vec<Module>,
}

impl Module {
    pub fn new(file_path: impl Into<String>) -> Self {
        Module {
            file_path: file_path.into(),
            enums: Vec::new(),
            functions: Vec::new(),
            structs: Vec::new(),
            variables: Vec::new(),
            import_paths: Vec::new(),
            imports: Vec::new(),
        }
    }

    pub fn find_struct(&self, name: &str) -> Option<&StructDef> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn find_enum(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name == name)
    }

    pub fn find_own_function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.prototype.name == name)
    }

    /// Searches this module's own functions first; on miss, recursively
    /// searches imported modules breadth-first, skipping any module whose
    /// `file_path` was already visited in this traversal (spec §4.6's
    /// cycle break via canonical path identity).
    pub fn resolve_function(&self, name: &str) -> Option<&Function> {
        let mut visited = HashSet::new();
        self.resolve_function_inner(name, &mut visited)
    }

    fn resolve_function_inner<'a>(&'a self, name: &str, visited: &mut HashSet<String>) -> Option<&'a Function> {
        if !visited.insert(self.file_path.clone()) {
            return None;
        }

        if let Some(f) = self.find_own_function(name) {
            return Some(f);
        }

        for imported in &self.imports {
            if let Some(f) = imported.resolve_function_inner(name, visited) {
                return Some(f);
            }
        }

        None
    }

    /// Same breadth-first, cycle-broken search, for struct/enum names —
    /// needed once a call or get-expression reaches across an import
    /// boundary.
    pub fn resolve_struct(&self, name: &str) -> Option<&StructDef> {
        let mut visited = HashSet::new();
        self.resolve_struct_inner(name, &mut visited)
    }

    fn resolve_struct_inner<'a>(&'a self, name: &str, visited: &mut HashSet<String>) -> Option<&'a StructDef> {
        if !visited.insert(self.file_path.clone()) {
            return None;
        }
        if let Some(s) = self.find_struct(name) {
            return Some(s);
        }
        for imported in &self.imports {
            if let Some(s) = imported.resolve_struct_inner(name, visited) {
                return Some(s);
            }
        }
        None
    }

    pub fn resolve_enum(&self, name: &str) -> Option<&EnumDef> {
        let mut visited = HashSet::new();
        self.resolve_enum_inner(name, &mut visited)
    }

    fn resolve_enum_inner<'a>(&'a self, name: &str, visited: &mut HashSet<String>) -> Option<&'a EnumDef> {
        if !visited.insert(self.file_path.clone()) {
            return None;
        }
        if let Some(e) = self.find_enum(name) {
            return Some(e);
        }
        for imported in &self.imports {
            if let Some(e) = imported.resolve_enum_inner(name, visited) {
                return Some(e);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Prototype;
    use crate::types::{Base, Type};

    fn func(name: &str) -> Function {
        Function {
            prototype: Prototype {
                name: name.to_string(),
                args: vec![],
                arg_types: vec![],
                return_type: Type::new(Base::Void),
                is_variadic: false,
            },
            body: vec![],
        }
    }

    #[test]
    fn resolves_own_function_first() {
        let mut module = Module::new("a.luka");
        module.functions.push(func("f"));
        assert!(module.resolve_function("f").is_some());
    }

    #[test]
    fn resolves_through_import() {
        let mut imported = Module::new("b.luka");
        imported.functions.push(func("g"));

        let mut module = Module::new("a.luka");
        module.imports.push(imported);

        assert!(module.resolve_function("g").is_some());
        assert!(module.resolve_function("missing").is_none());
    }

    #[test]
    fn import_cycle_does_not_infinite_loop() {
        let mut a = Module::new("a.luka");
        let mut b = Module::new("b.luka");
        b.functions.push(func("from_b"));
        b.imports.push(a.clone());
        a.imports.push(b);

        assert!(a.resolve_function("from_b").is_some());
    }
}
