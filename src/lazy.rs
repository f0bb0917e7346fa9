use super::*;
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

enum Field<V> {
    Ready(V),
    Deferred { value: OnceCell<V>, producer: Box<dyn Producer<Output = V>> },
}

impl<V> Field<V> {
    fn get(&self) -> Result<&V, EvalError> {
        let (value, producer) = match self {
            Field::Ready(v) => return Ok(v),
            Field::Deferred { value, producer } => (value, producer),
        };
        if let Some(v) = value.get() {
            return Ok(v);
        }
        tracing::trace!("forcing lazy value");
        let produced = producer
            .produce()
            .inspect_err(|e| tracing::debug!(error = %e, "lazy evaluation failed"))?;
        // A reentrant producer may already have filled the cell: keep the first value.
        Ok(value.get_or_init(|| produced))
    }

    fn peek(&self) -> Option<&V> {
        match self {
            Field::Ready(v) => Some(v),
            Field::Deferred { value, .. } => value.get(),
        }
    }
}

/// Single threaded lazy value.
///
/// Clones share the same cell, so a value forced through one clone is seen by
/// all of them. Failed evaluations are not cached: the next `get` runs the
/// producer again.
pub struct Lazy<V>(Rc<Field<V>>);

impl<V> Lazy<V> {
    pub fn new<P: Producer<Output = V> + 'static>(producer: P) -> Self {
        Lazy(Rc::new(Field::Deferred { value: OnceCell::new(), producer: Box::new(producer) }))
    }

    pub fn evaluated(value: V) -> Self {
        Lazy(Rc::new(Field::Ready(value)))
    }

    pub fn get(&self) -> Result<&V, EvalError> {
        self.0.get()
    }

    pub fn is_evaluated(&self) -> bool {
        self.0.peek().is_some()
    }

    /// `true` when both handles share the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn peek(&self) -> Option<&V> {
        self.0.peek()
    }
}

impl<V> Clone for Lazy<V> {
    fn clone(&self) -> Self {
        Lazy(Rc::clone(&self.0))
    }
}

impl<V: fmt::Debug> fmt::Debug for Lazy<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            Some(v) => f.debug_tuple("Lazy").field(v).finish(),
            None => f.write_str("Lazy(<unevaluated>)"),
        }
    }
}
