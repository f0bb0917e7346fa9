//! Lazily evaluated fields for immutable records.
//!
//! A [`Producer`] is a deferred, possibly failing computation. [`Lazy`] and
//! [`LazySync`] wrap one in a shared memoizing handle, and the records in
//! [`record`] carry such handles through their `with_*` copy-updates without
//! ever forcing them.

use thiserror::Error;

mod lazy;
pub mod record;
mod sync;
pub mod verify;

pub use lazy::Lazy;
pub use sync::{LazySync, SharedProducer};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("arithmetic error: {0}")]
    Arithmetic(String),
    #[error("evaluation failed: {0}")]
    Failed(String),
    /// A producer panicked while another thread held the evaluation guard.
    #[error("lazy value poisoned by a panicking producer")]
    Poisoned,
}

pub trait Producer {
    type Output;

    fn produce(&self) -> Result<Self::Output, EvalError>;
}

impl<V, F: Fn() -> Result<V, EvalError>> Producer for F {
    type Output = V;

    fn produce(&self) -> Result<V, EvalError> {
        self()
    }
}

/// Producer that always hands out a clone of the same value.
#[derive(Debug, Clone)]
pub struct Constant<V>(V);

impl<V: Clone> Producer for Constant<V> {
    type Output = V;

    fn produce(&self) -> Result<V, EvalError> {
        Ok(self.0.clone())
    }
}

pub fn constant<V: Clone>(value: V) -> Constant<V> {
    Constant(value)
}

/// Integer division that reports a zero divisor (or `MIN / -1`) as an
/// [`EvalError::Arithmetic`] instead of panicking.
pub fn checked_div(dividend: i32, divisor: i32) -> Result<i32, EvalError> {
    if divisor == 0 {
        return Err(EvalError::Arithmetic("/ by zero".to_string()));
    }
    dividend
        .checked_div(divisor)
        .ok_or_else(|| EvalError::Arithmetic(format!("{} / {} overflows", dividend, divisor)))
}
