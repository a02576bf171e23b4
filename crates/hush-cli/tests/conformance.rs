use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hush_cli::fixture::CaseState;
use hush_cli::{collect, run, Case, CaseOutcome, Filter, ParamValue, Reporter, RunnerConfig};
use hush_engine::factory::{LITE_UUID, SOFTWARE_UUID};
use hush_engine::{
    register_default_services, DispatchPool, Registry, SoftwareFactory, TransportConfig,
};
use hush_hal::noise_suppression::{Level, NoiseSuppression, TYPE_UUID};
use hush_hal::{
    CommandId, Descriptor, Effect, Factory, OpenParameters, Parameter, ParameterId, Specific,
    State, Status, Uuid,
};

#[derive(Default)]
struct Recorder {
    collected: Option<usize>,
    outcomes: Vec<(String, CaseOutcome)>,
}

impl Reporter for Recorder {
    fn on_collection_complete(&mut self, case_count: usize) {
        self.collected = Some(case_count);
    }
    fn on_case_complete(&mut self, case: &Case, outcome: &CaseOutcome) {
        self.outcomes.push((case.name(), outcome.clone()));
    }
}

fn outcome<'a>(rec: &'a Recorder, suffix: &str, uuid: &Uuid) -> &'a CaseOutcome {
    let uuid = uuid.to_string().replace('-', "_");
    &rec.outcomes
        .iter()
        .find(|(name, _)| name.contains(&uuid) && name.ends_with(suffix))
        .unwrap_or_else(|| panic!("no case {suffix} for {uuid}"))
        .1
}

#[test]
fn builtin_implementations_pass() {
    let pool = DispatchPool::start(&TransportConfig::default()).unwrap();
    let registry = Registry::new();
    register_default_services(&registry, &pool);

    let cfg = RunnerConfig::default();
    let cases = collect(&registry, &cfg.filter);
    // two implementations x (three levels + two types)
    assert_eq!(cases.len(), 10);

    let mut rec = Recorder::default();
    let summary = run(&cases, &cfg, &mut rec);
    assert!(summary.success(), "failed: {:?}", summary.failed);
    assert_eq!(summary.total, 10);
    assert_eq!(summary.passed, 10);
    assert_eq!(rec.collected, Some(10));

    for (_, o) in &rec.outcomes {
        assert_eq!(o.final_state, CaseState::Destroyed);
        assert!(!o.aborted);
    }

    assert_eq!(outcome(&rec, "_level_HIGH", &SOFTWARE_UUID).failures.len(), 0);
    // the lite implementation refuses HIGH and MULTI_CHANNEL as advertised
    assert_eq!(outcome(&rec, "_level_HIGH", &LITE_UUID).failures.len(), 0);
    assert_eq!(outcome(&rec, "_type_MULTI_CHANNEL", &LITE_UUID).failures.len(), 0);
}

#[test]
fn level_cases_run_before_type_cases() {
    let registry = Registry::new();
    registry.register("default", Arc::new(SoftwareFactory::new()));
    let names: Vec<String> =
        collect(&registry, &Filter::default()).iter().map(Case::full_name).collect();
    let level_prefix = "NSParamTest/NSParamTest.SetAndGetLevel/";
    let type_prefix = "NSParamTypeTest/NSParamTypeTest.SetAndGetType/";
    assert!(names[..6].iter().all(|n| n.starts_with(level_prefix)));
    assert!(names[6..].iter().all(|n| n.starts_with(type_prefix)));
    assert_eq!(
        names[0],
        "NSParamTest/NSParamTest.SetAndGetLevel/\
         Implementor_The_Hush_Project_name_NoiseSuppressionSw_\
         UUID_c06c8400_8e06_11e0_9cb6_0002a5d5c51b_level_LOW"
    );
}

#[test]
fn existing_level_filters_select_level_cases() {
    let registry = Registry::new();
    registry.register("default", Arc::new(SoftwareFactory::new()));

    let levels = collect(&registry, &Filter::parse("NSParamTest/NSParamTest.SetAndGetLevel/*"));
    assert_eq!(levels.len(), 6);
    assert!(levels.iter().all(|c| matches!(c.value, ParamValue::Level(_))));

    let suite = collect(&registry, &Filter::parse("NSParamTest/*"));
    assert_eq!(suite.len(), 6);
    let types = collect(&registry, &Filter::parse("NSParamTypeTest/*"));
    assert_eq!(types.len(), 4);
}

#[test]
fn zero_instances_is_success() {
    let registry = Registry::new();
    let cfg = RunnerConfig::default();
    let cases = collect(&registry, &cfg.filter);
    assert!(cases.is_empty());

    let mut rec = Recorder::default();
    let summary = run(&cases, &cfg, &mut rec);
    assert_eq!(rec.collected, Some(0));
    assert_eq!(summary.total, 0);
    assert!(summary.success());
}

#[test]
fn filter_selects_cases() {
    let registry = Registry::new();
    registry.register("default", Arc::new(SoftwareFactory::new()));

    let high = collect(&registry, &Filter::parse("*_level_HIGH"));
    assert_eq!(high.len(), 2);
    let no_types = collect(&registry, &Filter::parse("-*NSParamTypeTest*"));
    assert_eq!(no_types.len(), 6);
}

/// How a [`Faulty`] effect misbehaves.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Fault {
    None,
    NullInstance,
    OpenFails,
    DescriptorFails,
    SetFails,
    GetReturnsLow,
    CloseFails,
}

struct FaultyEffect {
    descriptor: Descriptor,
    fault: Fault,
    level: parking_lot::Mutex<Level>,
    closed: AtomicUsize,
}

impl Effect for FaultyEffect {
    fn open(&self, _common: &OpenParameters, _specific: Option<&Specific>) -> hush_hal::Result<()> {
        if self.fault == Fault::OpenFails {
            return Err(Status::illegal_argument("refusing to open"));
        }
        Ok(())
    }
    fn close(&self) -> hush_hal::Result<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        if self.fault == Fault::CloseFails {
            return Err(Status::illegal_state("stuck"));
        }
        Ok(())
    }
    fn descriptor(&self) -> hush_hal::Result<Descriptor> {
        if self.fault == Fault::DescriptorFails {
            return Err(Status::transaction_failed("descriptor lost"));
        }
        Ok(self.descriptor.clone())
    }
    fn state(&self) -> hush_hal::Result<State> {
        Ok(State::Idle)
    }
    fn command(&self, _command: CommandId) -> hush_hal::Result<()> {
        Ok(())
    }
    fn set_parameter(&self, param: &Parameter) -> hush_hal::Result<()> {
        if self.fault == Fault::SetFails {
            return Err(Status::unsupported("no parameters here"));
        }
        let ns = match param {
            Parameter::Specific(Specific::NoiseSuppression(ns)) => ns,
            _ => return Ok(()),
        };
        if let NoiseSuppression::Level(level) = ns {
            *self.level.lock() = *level;
        }
        Ok(())
    }
    fn get_parameter(&self, _id: &ParameterId) -> hush_hal::Result<Parameter> {
        let level = if self.fault == Fault::GetReturnsLow {
            Level::Low
        } else {
            *self.level.lock()
        };
        Ok(Parameter::noise_suppression(NoiseSuppression::Level(level)))
    }
    fn process(&self, _input: &[f32], _output: &mut [f32]) -> hush_hal::Result<usize> {
        Err(Status::unsupported("no data path"))
    }
}

struct FaultyFactory {
    descriptor: Descriptor,
    fault: Fault,
    created: AtomicUsize,
    destroyed: AtomicUsize,
    last: parking_lot::Mutex<Option<Arc<FaultyEffect>>>,
}

impl FaultyFactory {
    fn new(fault: Fault) -> Arc<Self> {
        let uuid = Uuid::from_u128(0xabc_123);
        Arc::new(Self {
            descriptor: Descriptor::new(TYPE_UUID, uuid, "Vendor_X", "Faulty NS"),
            fault,
            created: AtomicUsize::new(0),
            destroyed: AtomicUsize::new(0),
            last: parking_lot::Mutex::new(None),
        })
    }
}

impl Factory for FaultyFactory {
    fn query_effects(
        &self,
        _type_uuid: Option<&Uuid>,
        _uuid: Option<&Uuid>,
    ) -> hush_hal::Result<Vec<Descriptor>> {
        Ok(vec![self.descriptor.clone()])
    }
    fn create_effect(&self, _uuid: &Uuid) -> hush_hal::Result<Option<Arc<dyn Effect>>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        if self.fault == Fault::NullInstance {
            return Ok(None);
        }
        let fx = Arc::new(FaultyEffect {
            descriptor: self.descriptor.clone(),
            fault: self.fault,
            level: parking_lot::Mutex::new(Level::Medium),
            closed: AtomicUsize::new(0),
        });
        *self.last.lock() = Some(fx.clone());
        Ok(Some(fx))
    }
    fn destroy_effect(&self, _handle: &Arc<dyn Effect>) -> hush_hal::Result<()> {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn run_single(factory: Arc<FaultyFactory>, filter: &str) -> (Recorder, hush_cli::Summary) {
    let registry = Registry::new();
    registry.register("vendor", factory);
    let cfg = RunnerConfig { filter: Filter::parse(filter), ..RunnerConfig::default() };
    let cases = collect(&registry, &cfg.filter);
    let mut rec = Recorder::default();
    let summary = run(&cases, &cfg, &mut rec);
    (rec, summary)
}

#[test]
fn vendor_x_high_round_trips() {
    let factory = FaultyFactory::new(Fault::None);
    let (rec, summary) = run_single(factory.clone(), "*_level_HIGH");
    assert_eq!(summary.total, 1);
    assert!(summary.success());
    let (name, o) = &rec.outcomes[0];
    assert_eq!(
        name,
        "Implementor_Vendor_X_name_Faulty_NS_UUID_00000000_0000_0000_0000_000000abc123_level_HIGH"
    );
    assert_eq!(o.final_state, CaseState::Destroyed);
    assert_eq!(factory.destroyed.load(Ordering::SeqCst), 1);
}

#[test]
fn null_instance_fails_without_teardown() {
    let factory = FaultyFactory::new(Fault::NullInstance);
    let (rec, summary) = run_single(factory.clone(), "*level*");
    assert_eq!(summary.failed.len(), 3);
    for (_, o) in &rec.outcomes {
        assert!(o.aborted);
        assert_eq!(o.final_state, CaseState::Pending);
        assert_eq!(o.failures, ["create_effect: got null"]);
    }
    assert_eq!(factory.destroyed.load(Ordering::SeqCst), 0);
}

#[test]
fn open_failure_aborts_case_but_destroys() {
    let factory = FaultyFactory::new(Fault::OpenFails);
    let (rec, summary) = run_single(factory.clone(), "*level*");
    assert_eq!(summary.total, 3);
    assert!(!summary.success());
    for (_, o) in &rec.outcomes {
        assert!(o.aborted);
        assert_eq!(o.final_state, CaseState::Destroyed);
        assert_eq!(o.failures.len(), 1);
        assert!(o.failures[0].starts_with("open: expected EX_NONE, got EX_ILLEGAL_ARGUMENT"));
    }
    assert_eq!(factory.created.load(Ordering::SeqCst), 3);
    assert_eq!(factory.destroyed.load(Ordering::SeqCst), 3);
}

#[test]
fn descriptor_failure_aborts_before_set() {
    let factory = FaultyFactory::new(Fault::DescriptorFails);
    let (rec, summary) = run_single(factory.clone(), "*_level_HIGH");
    assert_eq!(summary.failed.len(), 1);
    let (_, o) = &rec.outcomes[0];
    assert!(o.aborted);
    assert_eq!(o.failures.len(), 1);
    assert!(o.failures[0].starts_with("descriptor: expected EX_NONE, got EX_TRANSACTION_FAILED"));
    assert_eq!(o.final_state, CaseState::Destroyed);
    // nothing was written
    let fx = factory.last.lock().clone().unwrap();
    assert_eq!(*fx.level.lock(), Level::Medium);
    assert_eq!(fx.closed.load(Ordering::SeqCst), 1);
    assert_eq!(factory.destroyed.load(Ordering::SeqCst), 1);
}

#[test]
fn unexpected_set_failure_is_recorded_and_skips_get() {
    let factory = FaultyFactory::new(Fault::SetFails);
    let (rec, _) = run_single(factory, "*_level_LOW");
    let (_, o) = &rec.outcomes[0];
    assert!(!o.aborted);
    assert_eq!(o.failures.len(), 1);
    let expected = "set_parameter: expected EX_NONE, got EX_UNSUPPORTED_OPERATION";
    assert!(o.failures[0].starts_with(expected));
    assert_eq!(o.final_state, CaseState::Destroyed);
}

#[test]
fn mismatched_get_reports_both_values() {
    let factory = FaultyFactory::new(Fault::GetReturnsLow);
    let (rec, summary) = run_single(factory.clone(), "*level*");
    // LOW matches by accident, MEDIUM and HIGH don't
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed.len(), 2);

    let high = &rec.outcomes.iter().find(|(n, _)| n.ends_with("_level_HIGH")).unwrap().1;
    assert!(!high.aborted);
    assert_eq!(high.failures.len(), 1);
    assert!(high.failures[0].contains("Level(High)"));
    assert!(high.failures[0].contains("Level(Low)"));
    assert_eq!(high.final_state, CaseState::Destroyed);
    assert_eq!(factory.destroyed.load(Ordering::SeqCst), 3);
}

#[test]
fn failed_close_skips_destroy() {
    let factory = FaultyFactory::new(Fault::CloseFails);
    let (rec, _) = run_single(factory.clone(), "*_level_MEDIUM");
    let (_, o) = &rec.outcomes[0];
    assert_eq!(o.final_state, CaseState::ParamVerified);
    assert!(o.failures[0].starts_with("close: expected EX_NONE, got EX_ILLEGAL_STATE"));
    let closed = factory.last.lock().as_ref().unwrap().closed.load(Ordering::SeqCst);
    assert_eq!(closed, 1);
    assert_eq!(factory.destroyed.load(Ordering::SeqCst), 0);
}

#[test]
fn fail_fast_stops_after_first_failure() {
    let registry = Registry::new();
    registry.register("vendor", FaultyFactory::new(Fault::OpenFails));
    let cfg = RunnerConfig { fail_fast: true, ..RunnerConfig::default() };
    let cases = collect(&registry, &cfg.filter);
    assert_eq!(cases.len(), 5);
    let summary = run(&cases, &cfg, &mut Recorder::default());
    assert_eq!(summary.total, 1);
    assert_eq!(summary.failed.len(), 1);
}
