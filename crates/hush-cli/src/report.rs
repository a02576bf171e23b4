use std::time::Duration;

use crate::case::{Case, CaseOutcome};

/// Totals for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: Vec<String>,
    pub duration: Duration,
}

impl Summary {
    /// Zero cases is a success.
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Receives progress from the runner.
pub trait Reporter {
    fn on_collection_complete(&mut self, _case_count: usize) {}
    fn on_case_start(&mut self, _case: &Case) {}
    fn on_case_complete(&mut self, case: &Case, outcome: &CaseOutcome);
    fn on_run_complete(&mut self, _summary: &Summary) {}
}

/// Console output in the familiar `[ RUN      ]` / `[       OK ]` layout.
#[derive(Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn on_collection_complete(&mut self, case_count: usize) {
        println!("[==========] Running {case_count} test(s).");
    }

    fn on_case_start(&mut self, case: &Case) {
        println!("[ RUN      ] {}", case.full_name());
    }

    fn on_case_complete(&mut self, case: &Case, outcome: &CaseOutcome) {
        for failure in &outcome.failures {
            println!("Failure: {failure}");
        }
        let ms = outcome.duration.as_millis();
        if outcome.passed() {
            println!("[       OK ] {} ({ms} ms)", case.full_name());
        } else {
            println!("[  FAILED  ] {} ({ms} ms)", case.full_name());
        }
    }

    fn on_run_complete(&mut self, summary: &Summary) {
        let ms = summary.duration.as_millis();
        println!("[==========] {} test(s) ran. ({ms} ms total)", summary.total);
        println!("[  PASSED  ] {} test(s).", summary.passed);
        if !summary.failed.is_empty() {
            println!("[  FAILED  ] {} test(s), listed below:", summary.failed.len());
            for name in &summary.failed {
                println!("[  FAILED  ] {name}");
            }
        }
    }
}
