use super::*;
use lazy_record::{checked_div, EvalError, Producer};
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[test]
fn should_return_42() {
    let s = param(|| Ok::<_, EvalError>(42));

    assert_eq!(Ok(&42), s.get());
}

#[test]
fn should_return_42_also_after_changed_backing_field_value() {
    static SEED: AtomicI32 = AtomicI32::new(42);

    let s = param(|| Ok::<_, EvalError>(SEED.load(Ordering::SeqCst)));

    assert_eq!(Ok(&42), s.get());

    SEED.store(43, Ordering::SeqCst);
    assert_eq!(Ok(&42), s.get());
}

#[test]
fn should_call_producer_just_once() {
    let sentinel = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&sentinel);

    let p = param(move || {
        *counter.lock().unwrap() += 1;
        Ok::<_, EvalError>(42)
    });

    assert_eq!(Ok(&42), p.get());
    p.get().unwrap();
    assert_eq!(1, *sentinel.lock().unwrap());
}

#[test]
fn should_not_call_producer_before_get() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let p = param(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        checked_div(1, 0)
    });

    assert!(!p.is_evaluated());
    assert_eq!(0, calls.load(Ordering::SeqCst));
}

#[test]
fn should_raise_producer_error_on_get() {
    let p = param(|| checked_div(1, 0));

    assert_eq!(Err(EvalError::Arithmetic("/ by zero".to_string())), p.get());
    assert!(!p.is_evaluated());
}

#[test]
fn failed_evaluation_is_retried_on_next_get() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let p = param(move || match counter.fetch_add(1, Ordering::SeqCst) {
        0 => Err(EvalError::Failed("not yet".to_string())),
        _ => Ok(7),
    });

    assert_eq!(Err(EvalError::Failed("not yet".to_string())), p.get());
    assert_eq!(Ok(&7), p.get());
    assert_eq!(Ok(&7), p.get());
    assert_eq!(2, calls.load(Ordering::SeqCst));
}

#[test]
fn clones_share_the_evaluated_value() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let p = param(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok::<_, EvalError>(42)
    });
    let q = p.clone();

    assert!(p.ptr_eq(&q));
    assert_eq!(Ok(&42), q.get());
    assert!(p.is_evaluated());
    assert_eq!(Ok(&42), p.get());
    assert_eq!(1, calls.load(Ordering::SeqCst));
}

#[test]
fn should_work_with_string_too() {
    let p = param(|| Ok::<_, EvalError>("string slice"));

    assert_eq!(Ok(&"string slice"), p.get());
}

#[test]
fn use_producer_trait() {
    struct P;
    impl Producer for P {
        type Output = i32;

        fn produce(&self) -> Result<Self::Output, EvalError> {
            Ok(42)
        }
    }

    let p = param(P);

    assert_eq!(Ok(&42), p.get());
}

#[test]
fn use_constant_producer() {
    let p = param(lazy_record::constant("42".to_string()));

    assert_eq!("42", p.get().unwrap());
}

#[test]
fn use_function_as_producer() {
    fn producer() -> Result<i32, EvalError> {
        Ok(42)
    }

    let p = param(producer);

    assert_eq!(Ok(&42), p.get());
}
