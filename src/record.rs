//! Immutable records with a lazy field, shaped the way the datatype generator
//! emits them: `A` declares `normal_field` and `lazy_field`, `B` extends it
//! with `dummy_field`.
//!
//! Construction and every `with_*` copy-update move the lazy handle across
//! untouched. Only [`AFields::lazy_field`] and [`B::try_eq`] force it.

use super::*;
use std::fmt;

/// Fields declared on the base record. Implemented by `A` and every record
/// extending it.
pub trait AFields: Sized {
    fn normal_field(&self) -> i32;

    fn lazy_field(&self) -> Result<&i32, EvalError>;

    fn with_normal_field(&self, normal_field: i32) -> Self;

    fn with_lazy_field(&self, lazy_field: Lazy<i32>) -> Self;
}

#[derive(Clone, Debug)]
pub struct A {
    normal_field: i32,
    lazy_field: Lazy<i32>,
}

impl A {
    pub fn new(normal_field: i32, lazy_field: Lazy<i32>) -> Self {
        A { normal_field, lazy_field }
    }

    pub fn try_eq(&self, other: &A) -> Result<bool, EvalError> {
        if self.normal_field != other.normal_field {
            return Ok(false);
        }
        lazy_eq(&self.lazy_field, &other.lazy_field)
    }
}

impl AFields for A {
    fn normal_field(&self) -> i32 {
        self.normal_field
    }

    fn lazy_field(&self) -> Result<&i32, EvalError> {
        self.lazy_field.get()
    }

    fn with_normal_field(&self, normal_field: i32) -> Self {
        A { normal_field, lazy_field: self.lazy_field.clone() }
    }

    fn with_lazy_field(&self, lazy_field: Lazy<i32>) -> Self {
        A { normal_field: self.normal_field, lazy_field }
    }
}

impl fmt::Display for A {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A(normalField: {}, lazyField: {})",
            self.normal_field,
            LazyDisplay(&self.lazy_field)
        )
    }
}

#[derive(Clone, Debug)]
pub struct B {
    base: A,
    dummy_field: i32,
}

impl B {
    pub fn new(normal_field: i32, dummy_field: i32, lazy_field: Lazy<i32>) -> Self {
        B { base: A::new(normal_field, lazy_field), dummy_field }
    }

    pub fn dummy_field(&self) -> i32 {
        self.dummy_field
    }

    pub fn with_dummy_field(&self, dummy_field: i32) -> Self {
        B { base: self.base.clone(), dummy_field }
    }

    pub fn as_a(&self) -> &A {
        &self.base
    }

    /// Field-by-field equality. Lazy fields are forced unless both records
    /// share the same handle, so evaluation errors surface here.
    pub fn try_eq(&self, other: &B) -> Result<bool, EvalError> {
        if self.dummy_field != other.dummy_field {
            return Ok(false);
        }
        self.base.try_eq(&other.base)
    }
}

impl AFields for B {
    fn normal_field(&self) -> i32 {
        self.base.normal_field()
    }

    fn lazy_field(&self) -> Result<&i32, EvalError> {
        self.base.lazy_field()
    }

    fn with_normal_field(&self, normal_field: i32) -> Self {
        B { base: self.base.with_normal_field(normal_field), dummy_field: self.dummy_field }
    }

    fn with_lazy_field(&self, lazy_field: Lazy<i32>) -> Self {
        B { base: self.base.with_lazy_field(lazy_field), dummy_field: self.dummy_field }
    }
}

impl From<B> for A {
    fn from(b: B) -> A {
        b.base
    }
}

impl fmt::Display for B {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "B(normalField: {}, dummyField: {}, lazyField: {})",
            self.base.normal_field,
            self.dummy_field,
            LazyDisplay(&self.base.lazy_field)
        )
    }
}

fn lazy_eq(left: &Lazy<i32>, right: &Lazy<i32>) -> Result<bool, EvalError> {
    if left.ptr_eq(right) {
        return Ok(true);
    }
    Ok(left.get()? == right.get()?)
}

struct LazyDisplay<'a>(&'a Lazy<i32>);

impl fmt::Display for LazyDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.peek() {
            Some(v) => write!(f, "{}", v),
            None => f.write_str("<lazy>"),
        }
    }
}
