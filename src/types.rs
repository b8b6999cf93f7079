//! Value type representation (spec §3 `Type`, §4.4 type utilities).
//!
//! Grounded on `original_source/include/defs.h`'s `t_type` struct and
//! `src/type.c`'s `TYPE_equal`/`TYPE_dup_type`/`TYPE_sizeof`/`TYPE_to_string`.
//! Where the teacher (why_lib) models types as an enum with embedded
//! payloads, this stays closer to the original's flat `{base, inner,
//! payload, mutable}` shape since spec §3 pins that shape down explicitly
//! (nominal struct/enum/alias identity lives in `payload`, not in the
//! enum discriminant carrying a `String` directly) — `inner`/`payload` are
//! `Option<Box<_>>`/`Option<String>` rather than raw pointers.

use std::fmt::{self, Display};

/// `t_base_type` from the original source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Base {
    Any,
    Bool,
    S8,
    S16,
    S32,
    S64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    Void,
    Ptr,
    Struct,
    Enum,
    Array,
    Alias,
}

/// `{ base, inner, payload, mutable }` from spec §3.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Type {
    pub base: Base,
    pub inner: Option<Box<Type>>,
    pub payload: Option<String>,
    pub mutable: bool,
}

impl Type {
    pub fn new(base: Base) -> Self {
        Type {
            base,
            inner: None,
            payload: None,
            mutable: false,
        }
    }

    pub fn ptr(inner: Type) -> Self {
        Type {
            base: Base::Ptr,
            inner: Some(Box::new(inner)),
            payload: None,
            mutable: false,
        }
    }

    pub fn array(inner: Type) -> Self {
        Type {
            base: Base::Array,
            inner: Some(Box::new(inner)),
            payload: None,
            mutable: false,
        }
    }

    pub fn named(base: Base, name: impl Into<String>) -> Self {
        Type {
            base,
            inner: None,
            payload: Some(name.into()),
            mutable: false,
        }
    }

    pub fn with_mutable(mut self, mutable: bool) -> Self {
        self.mutable = mutable;
        self
    }

    /// Whether this base carries a nominal name (struct/enum/alias).
    pub fn is_payload_type(&self) -> bool {
        matches!(self.base, Base::Struct | Base::Enum | Base::Alias)
    }

    /// Structural equality plus the `any` wildcard (spec §4.4, §8).
    ///
    /// `any` compares equal to anything *at its level*; the recursion
    /// still requires inner-type and payload agreement on the non-`any`
    /// side's substructure where applicable, matching `TYPE_equal`'s
    /// `equal = equal || (type1->type == TYPE_ANY || type2->type ==
    /// TYPE_ANY)` — the wildcard shortcuts the whole comparison, not just
    /// the base discriminant, because it is `||`ed in *after* the other
    /// conjuncts were already computed but still overrides them.
    ///
    /// Deliberately does NOT also require `self.mutable == other.mutable`.
    /// `original_source/src/type.c`'s `TYPE_equal` ANDs that in
    /// unconditionally at the end, which would make spec §8 scenario 6's
    /// own worked example (`x = 1` assigning a non-mutable literal into a
    /// `mut s32` parameter) fail to type-check under a strict port, since
    /// the literal's type is never mutable. Spec §4.7 already treats
    /// mutability as a separate, asymmetric check bolted onto specific
    /// rules (assignment requires the lhs's type to be mutable; a call
    /// argument must be mutable only if the declared parameter is) rather
    /// than folding it into the general equality predicate, so that is
    /// what this crate does too — see `typechecker::check_node`.
    pub fn equal(&self, other: &Type) -> bool {
        if self.base == Base::Any || other.base == Base::Any {
            return true;
        }

        if Self::is_string_and_ptr_u8(self, other) || Self::is_string_and_ptr_u8(other, self) {
            return true;
        }

        if self.base != other.base {
            return false;
        }

        let inner_eq = match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => a.equal(b),
            (None, None) => true,
            _ => false,
        };

        let payload_eq = if self.is_payload_type() {
            self.payload == other.payload
        } else {
            true
        };

        inner_eq && payload_eq
    }

    /// Whether `a` is `string` and `b` is `u8*` — the one base-mismatch
    /// `equal()` forgives. A string literal infers as `ptr u8` (spec §4.4)
    /// but the `string` keyword parses to its own base (spec §3's base
    /// list), so without this a `string`-typed parameter could never
    /// accept a string literal argument. `original_source/src/type.c`'s
    /// `TYPE_equal` does not special-case this — this is a deliberate
    /// deviation, not a port, since `string` has no literal form of its own
    /// to ever satisfy a strict reading.
    fn is_string_and_ptr_u8(a: &Type, b: &Type) -> bool {
        a.base == Base::String
            && b.base == Base::Ptr
            && b.inner.as_deref().map(|t| t.base) == Some(Base::U8)
    }

    /// Deep copy including the payload string and inner chain (spec §8).
    pub fn duplicate(&self) -> Type {
        Type {
            base: self.base,
            inner: self.inner.as_ref().map(|t| Box::new(t.duplicate())),
            payload: self.payload.clone(),
            mutable: self.mutable,
        }
    }

    /// Bit width, per `TYPE_sizeof`.
    pub fn size(&self) -> u32 {
        match self.base {
            Base::Any | Base::Void | Base::Struct => 0,
            Base::Bool => 1,
            Base::S8 | Base::U8 => 8,
            Base::S16 | Base::U16 => 16,
            Base::Enum | Base::S32 | Base::U32 | Base::F32 => 32,
            Base::S64 | Base::U64 | Base::F64 => 64,
            Base::Ptr | Base::Array => Self::pointer_width(),
            Base::String => Self::pointer_width(),
            Base::Alias => self.inner.as_ref().map(|t| t.size()).unwrap_or(0),
        }
    }

    fn pointer_width() -> u32 {
        (std::mem::size_of::<usize>() * 8) as u32
    }

    pub fn is_signed(&self) -> bool {
        matches!(self.base, Base::S8 | Base::S16 | Base::S32 | Base::S64)
    }

    pub fn is_floating(&self) -> bool {
        matches!(self.base, Base::F32 | Base::F64)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mutable {
            write!(f, "mut ")?;
        }
        match self.base {
            Base::Any => write!(f, "any"),
            Base::Bool => write!(f, "bool"),
            Base::S8 => write!(f, "s8"),
            Base::S16 => write!(f, "s16"),
            Base::S32 => write!(f, "s32"),
            Base::S64 => write!(f, "s64"),
            Base::U8 => write!(f, "u8"),
            Base::U16 => write!(f, "u16"),
            Base::U32 => write!(f, "u32"),
            Base::U64 => write!(f, "u64"),
            Base::F32 => write!(f, "f32"),
            Base::F64 => write!(f, "f64"),
            Base::String => write!(f, "string"),
            Base::Void => write!(f, "void"),
            Base::Ptr => write!(f, "{}*", self.inner.as_deref().map(ToString::to_string).unwrap_or_default()),
            Base::Array => write!(f, "{}[]", self.inner.as_deref().map(ToString::to_string).unwrap_or_default()),
            Base::Struct => write!(f, "struct {}", self.payload.as_deref().unwrap_or("?")),
            Base::Enum => write!(f, "enum {}", self.payload.as_deref().unwrap_or("?")),
            Base::Alias => write!(f, "{}", self.payload.as_deref().unwrap_or("?")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_is_reflexive() {
        let samples = vec![
            Type::new(Base::S32),
            Type::ptr(Type::new(Base::U8)),
            Type::named(Base::Struct, "Foo"),
            Type::new(Base::Any),
        ];
        for t in &samples {
            assert!(t.equal(t));
        }
    }

    #[test]
    fn any_is_a_wildcard_both_ways() {
        let any = Type::new(Base::Any);
        let s32 = Type::new(Base::S32);
        assert!(any.equal(&s32));
        assert!(s32.equal(&any));
    }

    #[test]
    fn duplicate_is_isolated_from_original() {
        let original = Type::named(Base::Struct, "Foo");
        let mut dup = original.duplicate();
        dup.payload = Some("Bar".into());
        assert_eq!(original.payload.as_deref(), Some("Foo"));
    }

    #[test]
    fn struct_equality_is_nominal() {
        let foo = Type::named(Base::Struct, "Foo");
        let bar = Type::named(Base::Struct, "Bar");
        assert!(!foo.equal(&bar));
    }

    #[test]
    fn sizes_match_spec_table() {
        assert_eq!(Type::new(Base::Bool).size(), 1);
        assert_eq!(Type::new(Base::S8).size(), 8);
        assert_eq!(Type::new(Base::S64).size(), 64);
        assert_eq!(Type::new(Base::Void).size(), 0);
    }

    #[test]
    fn string_keyword_accepts_a_string_literal_argument() {
        let string_param = Type::new(Base::String);
        let literal = Type::ptr(Type::new(Base::U8));
        assert!(string_param.equal(&literal));
        assert!(literal.equal(&string_param));
    }

    #[test]
    fn string_does_not_forgive_other_pointer_element_types() {
        let string_param = Type::new(Base::String);
        let ptr_s32 = Type::ptr(Type::new(Base::S32));
        assert!(!string_param.equal(&ptr_s32));
    }

    #[test]
    fn mutability_does_not_affect_structural_equality() {
        let mutable = Type::new(Base::S32).with_mutable(true);
        let plain = Type::new(Base::S32);
        assert!(mutable.equal(&plain));
        assert!(plain.equal(&mutable));
    }

    #[test]
    fn pretty_print() {
        assert_eq!(Type::new(Base::S32).with_mutable(true).to_string(), "mut s32");
        assert_eq!(Type::ptr(Type::new(Base::U8)).to_string(), "u8*");
        assert_eq!(Type::array(Type::new(Base::U8)).to_string(), "u8[]");
        assert_eq!(Type::named(Base::Struct, "Foo").to_string(), "struct Foo");
    }
}
