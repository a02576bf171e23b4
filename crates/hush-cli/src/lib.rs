//! Parameter conformance runner for noise-suppression effects.
//!
//! Discovers every implementation of the noise-suppression type, then for
//! each (implementation, value) pair opens an instance, writes the value,
//! reads it back and compares. Failures in the parameter calls are recorded
//! and the case carries on; failures in create/open/close/destroy end the
//! case. Teardown always runs.

pub mod case;
pub mod expect;
pub mod filter;
pub mod fixture;
pub mod naming;
pub mod report;
pub mod runner;

pub use case::{Case, CaseOutcome, ParamValue};
pub use filter::Filter;
pub use report::{ConsoleReporter, Reporter, Summary};
pub use runner::{collect, run, RunnerConfig};
