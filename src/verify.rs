//! The lazy-field regression scenario.
//!
//! Builds a `B` whose lazy field divides by zero and checks that reading plain
//! fields and copy-updating either level of the hierarchy never evaluates it,
//! while an explicit access does and reports the arithmetic error.

use std::cell::Cell;
use std::rc::Rc;

use super::record::{AFields, B};
use super::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("check `{check}` failed: expected {expected}, got {actual}")]
    Check { check: &'static str, expected: i32, actual: i32 },
    #[error("the lazy field was evaluated during `{check}` ({evaluations} evaluation(s))")]
    UnexpectedEvaluation { check: &'static str, evaluations: usize },
    #[error("accessing the lazy field returned {value} instead of raising an error")]
    MissingEvaluationError { value: i32 },
}

#[derive(Debug)]
pub struct Report {
    pub checks: Vec<&'static str>,
    pub evaluation_error: EvalError,
}

pub struct Scenario {
    lazy: Lazy<i32>,
    evaluations: Rc<Cell<usize>>,
}

impl Default for Scenario {
    fn default() -> Self {
        Scenario::with_producer(|| checked_div(1, 0))
    }
}

impl Scenario {
    /// Scenario whose lazy field is computed by `producer`. Every call to the
    /// producer is counted.
    pub fn with_producer<P: Producer<Output = i32> + 'static>(producer: P) -> Self {
        let evaluations = Rc::new(Cell::new(0));
        let counter = Rc::clone(&evaluations);
        let lazy = Lazy::new(move || {
            counter.set(counter.get() + 1);
            producer.produce()
        });
        Scenario { lazy, evaluations }
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations.get()
    }

    /// Runs every check once. Evaluations are counted from the start of this
    /// call, so a scenario can be run again after its lazy field was forced.
    pub fn run(&self) -> Result<Report, VerifyError> {
        let mut run = Run {
            scenario: self,
            checks: Vec::new(),
            baseline: self.evaluations(),
            was_evaluated: self.lazy.is_evaluated(),
        };

        let b = B::new(0, 1, self.lazy.clone());
        run.expect("b.normal_field() == 0", 0, b.normal_field())?;
        run.expect("b.dummy_field() == 1", 1, b.dummy_field())?;
        run.untouched("construct")?;

        // Field declared on the base record.
        let b_updated = b.with_normal_field(1);
        run.expect("b.with_normal_field(1).normal_field() == 1", 1, b_updated.normal_field())?;
        run.expect("b.with_normal_field(1).dummy_field() == 1", 1, b_updated.dummy_field())?;
        run.untouched("with_normal_field")?;

        // Field declared on the extending record, derived from the original `b`.
        let b_updated2 = b.with_dummy_field(0);
        run.expect("b.with_dummy_field(0).normal_field() == 0", 0, b_updated2.normal_field())?;
        run.expect("b.with_dummy_field(0).dummy_field() == 0", 0, b_updated2.dummy_field())?;
        run.untouched("with_dummy_field")?;

        match b.lazy_field() {
            Ok(value) => Err(VerifyError::MissingEvaluationError { value: *value }),
            Err(evaluation_error) => {
                tracing::info!(error = %evaluation_error, "lazy field raised on explicit access");
                run.checks.push("b.lazy_field() raises");
                Ok(Report { checks: run.checks, evaluation_error })
            }
        }
    }
}

struct Run<'a> {
    scenario: &'a Scenario,
    checks: Vec<&'static str>,
    baseline: usize,
    was_evaluated: bool,
}

impl Run<'_> {
    fn expect(
        &mut self,
        check: &'static str,
        expected: i32,
        actual: i32,
    ) -> Result<(), VerifyError> {
        if expected != actual {
            return Err(VerifyError::Check { check, expected, actual });
        }
        tracing::info!(check, "passed");
        self.checks.push(check);
        Ok(())
    }

    fn untouched(&mut self, check: &'static str) -> Result<(), VerifyError> {
        let evaluations = self.scenario.evaluations() - self.baseline;
        let newly_evaluated = !self.was_evaluated && self.scenario.lazy.is_evaluated();
        if evaluations != 0 || newly_evaluated {
            return Err(VerifyError::UnexpectedEvaluation { check, evaluations });
        }
        tracing::debug!(check, "lazy field still unevaluated");
        self.checks.push(check);
        Ok(())
    }
}

pub fn run() -> Result<Report, VerifyError> {
    Scenario::default().run()
}
