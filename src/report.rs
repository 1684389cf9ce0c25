//! Soft assertions.
//!
//! A [`Report`] collects named checks. Failing one check does not stop the
//! others; [`Report::assert_passed`] panics once at the end with every
//! failure listed, which is how a test surfaces them.

use std::fmt;

/// One failed check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssertionFailure {
    /// Short name of the check, e.g. `has property name`
    pub check: String,
    pub message: String,
}

impl AssertionFailure {
    pub fn new(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.check, self.message)
    }
}

/// Outcome of a group of independent checks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    passed: Vec<String>,
    failures: Vec<AssertionFailure>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a check; `Err` holds the failure message.
    pub fn check(&mut self, name: impl Into<String>, outcome: Result<(), String>) {
        let name = name.into();
        match outcome {
            Ok(()) => self.passed.push(name),
            Err(message) => {
                tracing::warn!(check = %name, %message, "assertion failed");
                self.failures.push(AssertionFailure::new(name, message));
            }
        }
    }

    pub fn pass(&mut self, name: impl Into<String>) {
        self.passed.push(name.into());
    }

    pub fn fail(&mut self, failure: AssertionFailure) {
        tracing::warn!(check = %failure.check, message = %failure.message, "assertion failed");
        self.failures.push(failure);
    }

    /// Names of the checks that passed, in the order they ran
    pub fn passed(&self) -> &[String] {
        &self.passed
    }

    pub fn failures(&self) -> &[AssertionFailure] {
        &self.failures
    }

    pub fn is_passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of checks recorded
    pub fn len(&self) -> usize {
        self.passed.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fold another report into this one, keeping order.
    pub fn merge(&mut self, other: Report) {
        self.passed.extend(other.passed);
        self.failures.extend(other.failures);
    }

    /// Panic with every recorded failure if any check failed.
    #[track_caller]
    pub fn assert_passed(&self) {
        if !self.failures.is_empty() {
            panic!("{}", self);
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failures.is_empty() {
            return write!(f, "{} check(s) passed", self.passed.len());
        }
        writeln!(
            f,
            "{} of {} check(s) failed:",
            self.failures.len(),
            self.len()
        )?;
        for failure in &self.failures {
            writeln!(f, "  - {}", failure)?;
        }
        Ok(())
    }
}
