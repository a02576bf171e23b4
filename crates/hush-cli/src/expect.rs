//! Expectation bookkeeping for one case.
//!
//! `expect_*` records a failure and lets the case continue; `assert_*`
//! records it and returns [`Abort`] so `?` ends the case body.

use std::fmt::Debug;

use hush_hal::{code_of, ExceptionCode, Status};

/// The current case body was cut short by a failed assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Abort;

#[derive(Debug, Default)]
pub struct Expectations {
    failures: Vec<String>,
}

impl Expectations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "expectation failed");
        self.failures.push(message);
    }

    /// Record a failure unless `result` carries `expected`. Returns whether it did.
    pub fn expect_status<T>(
        &mut self,
        expected: ExceptionCode,
        result: &Result<T, Status>,
        call: &str,
    ) -> bool {
        let actual = code_of(result);
        if actual == expected {
            return true;
        }
        let detail = match result {
            Err(status) => format!(" ({})", status.message),
            Ok(_) => String::new(),
        };
        self.fail(format!("{call}: expected {expected}, got {actual}{detail}"));
        false
    }

    pub fn expect_eq<T>(&mut self, expected: &T, actual: &T, what: &str) -> bool
    where
        T: PartialEq + Debug,
    {
        if expected == actual {
            return true;
        }
        self.fail(format!("{what}: expected {expected:?}, got {actual:?}"));
        false
    }

    /// Unwrap a successful call, aborting the case otherwise.
    pub fn assert_ok<T>(&mut self, result: Result<T, Status>, call: &str) -> Result<T, Abort> {
        if !self.expect_status(ExceptionCode::None, &result, call) {
            return Err(Abort);
        }
        result.map_err(|_| Abort)
    }

    /// Unwrap a present value, aborting the case otherwise.
    pub fn assert_some<T>(&mut self, value: Option<T>, what: &str) -> Result<T, Abort> {
        value.ok_or_else(|| {
            self.fail(format!("{what}: got null"));
            Abort
        })
    }
}
