//! Process-wide builtin prototype registry (spec §4.5). Grounded on
//! `original_source/src/core.c`'s `CORE_initialize_builtins`/`g_builtins`
//! (`NUMBER_OF_BUILTINS == 1`) and the teacher's `once_cell::sync::Lazy`
//! pattern for process-lifetime, write-once global state.

use once_cell::sync::Lazy;

use crate::parser::ast::Prototype;
use crate::types::{Base, Type};

/// `@sizeOf(type-expr) -> u64` — the sole builtin (spec §4.5, §11). The
/// argument slot is a placeholder name; callers pass a `type-expr` node,
/// not a value, so `arg_types[0]` is never consulted by the type checker
/// for this prototype.
static BUILTINS: Lazy<Vec<Prototype>> = Lazy::new(|| {
    vec![Prototype {
        name: "@sizeOf".to_string(),
        args: vec!["type".to_string()],
        arg_types: vec![Type::new(Base::Any)],
        return_type: Type::new(Base::U64),
        is_variadic: false,
    }]
});

/// Looks up a builtin prototype by the call's builtin-name. The table
/// initializes lazily on first use and lives for the process's lifetime;
/// there is no explicit teardown since nothing here owns a resource that
/// needs releasing.
pub fn lookup_builtin(name: &str) -> Option<&'static Prototype> {
    BUILTINS.iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_of_is_registered() {
        let proto = lookup_builtin("@sizeOf").expect("@sizeOf must be registered");
        assert_eq!(proto.return_type.base, Base::U64);
        assert!(!proto.is_variadic);
    }

    #[test]
    fn unknown_builtin_is_none() {
        assert!(lookup_builtin("@doesNotExist").is_none());
    }
}
