use std::time::Instant;

use tracing::{info, warn};

use hush_engine::Registry;
use hush_hal::noise_suppression::TYPE_UUID;
use hush_hal::OpenParameters;

use crate::case::{cross_join, Case};
use crate::filter::Filter;
use crate::report::{Reporter, Summary};

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub sample_rate: u32,
    pub input_frames: usize,
    pub output_frames: usize,
    pub filter: Filter,
    pub fail_fast: bool,
}

impl RunnerConfig {
    pub fn open_parameters(&self) -> OpenParameters {
        OpenParameters::new(self.sample_rate, self.input_frames, self.output_frames)
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        let open = OpenParameters::default();
        Self {
            sample_rate: open.input.sample_rate,
            input_frames: open.input.frame_count,
            output_frames: open.output.frame_count,
            filter: Filter::default(),
            fail_fast: false,
        }
    }
}

/// Discover every noise-suppression implementation in `registry` and build
/// the cases `filter` selects.
pub fn collect(registry: &Registry, filter: &Filter) -> Vec<Case> {
    let found = registry.discover(&TYPE_UUID);
    if found.is_empty() {
        // devices without the effect still pass
        warn!("no noise suppression implementations found");
    }
    info!(implementations = found.len(), "discovered");
    cross_join(&found)
        .into_iter()
        .filter(|c| filter.matches(&c.full_name()))
        .collect()
}

/// Run `cases` one after another.
pub fn run(cases: &[Case], cfg: &RunnerConfig, reporter: &mut dyn Reporter) -> Summary {
    let start = Instant::now();
    let common = cfg.open_parameters();
    let mut summary = Summary::default();

    reporter.on_collection_complete(cases.len());
    for case in cases {
        reporter.on_case_start(case);
        let outcome = case.run(&common);
        reporter.on_case_complete(case, &outcome);

        summary.total += 1;
        if outcome.passed() {
            summary.passed += 1;
        } else {
            warn!(
                case = %case.full_name(),
                failures = outcome.failures.len(),
                "case failed"
            );
            summary.failed.push(case.full_name());
            if cfg.fail_fast {
                break;
            }
        }
    }
    summary.duration = start.elapsed();
    reporter.on_run_complete(&summary);
    summary
}
