use super::*;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

pub trait SharedProducer: Producer + Send + Sync {}

impl<P: Producer + Send + Sync> SharedProducer for P {}

type BoxedProducer<V> = Box<dyn SharedProducer<Output = V> + Send + Sync>;

enum SyncField<V> {
    Ready(V),
    Deferred {
        value: OnceLock<V>,
        // Serializes production so concurrent first accesses call the producer once.
        guard: Mutex<()>,
        producer: BoxedProducer<V>,
    },
}

impl<V> SyncField<V> {
    fn get(&self) -> Result<&V, EvalError> {
        let (value, guard, producer) = match self {
            SyncField::Ready(v) => return Ok(v),
            SyncField::Deferred { value, guard, producer } => (value, guard, producer),
        };
        if let Some(v) = value.get() {
            return Ok(v);
        }
        let _guard = guard.lock().map_err(|_| EvalError::Poisoned)?;
        if let Some(v) = value.get() {
            return Ok(v);
        }
        tracing::trace!("forcing shared lazy value");
        let produced = producer
            .produce()
            .inspect_err(|e| tracing::debug!(error = %e, "shared lazy evaluation failed"))?;
        Ok(value.get_or_init(|| produced))
    }

    fn peek(&self) -> Option<&V> {
        match self {
            SyncField::Ready(v) => Some(v),
            SyncField::Deferred { value, .. } => value.get(),
        }
    }
}

/// Thread safe counterpart of [`Lazy`].
///
/// The producer must not force its own handle: the evaluation guard is not
/// reentrant.
pub struct LazySync<V>(Arc<SyncField<V>>);

impl<V> LazySync<V> {
    pub fn new<P: SharedProducer<Output = V> + 'static>(producer: P) -> Self {
        LazySync(Arc::new(SyncField::Deferred {
            value: OnceLock::new(),
            guard: Mutex::new(()),
            producer: Box::new(producer),
        }))
    }

    pub fn evaluated(value: V) -> Self {
        LazySync(Arc::new(SyncField::Ready(value)))
    }

    pub fn get(&self) -> Result<&V, EvalError> {
        self.0.get()
    }

    pub fn is_evaluated(&self) -> bool {
        self.0.peek().is_some()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<V> Clone for LazySync<V> {
    fn clone(&self) -> Self {
        LazySync(Arc::clone(&self.0))
    }
}

impl<V: fmt::Debug> fmt::Debug for LazySync<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.peek() {
            Some(v) => f.debug_tuple("LazySync").field(v).finish(),
            None => f.write_str("LazySync(<unevaluated>)"),
        }
    }
}
