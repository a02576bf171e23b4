//! Parameterized cases: one per (implementation, parameter value).

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use strum::IntoEnumIterator;

use hush_hal::noise_suppression::{Level, NoiseSuppression, Type};
use hush_hal::{Descriptor, ExceptionCode, Factory, OpenParameters, Parameter, Specific};

use crate::expect::{Abort, Expectations};
use crate::fixture::{CaseState, EffectFixture};
use crate::naming;

/// Value a case writes and reads back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamValue {
    Level(Level),
    Type(Type),
}

impl ParamValue {
    /// Values under test, one group per suite.
    pub fn suites() -> [Vec<ParamValue>; 2] {
        [
            Level::iter().map(ParamValue::Level).collect(),
            Type::iter().map(ParamValue::Type).collect(),
        ]
    }

    /// Suite name, also used as the instantiation name.
    pub fn suite(self) -> &'static str {
        match self {
            ParamValue::Level(_) => "NSParamTest",
            ParamValue::Type(_) => "NSParamTypeTest",
        }
    }

    pub fn test(self) -> &'static str {
        match self {
            ParamValue::Level(_) => "SetAndGetLevel",
            ParamValue::Type(_) => "SetAndGetType",
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            ParamValue::Level(_) => "level",
            ParamValue::Type(_) => "type",
        }
    }

    pub fn to_noise_suppression(self) -> NoiseSuppression {
        match self {
            ParamValue::Level(level) => NoiseSuppression::Level(level),
            ParamValue::Type(ty) => NoiseSuppression::Type(ty),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Level(level) => fmt::Display::fmt(level, f),
            ParamValue::Type(ty) => fmt::Display::fmt(ty, f),
        }
    }
}

pub struct Case {
    pub factory: Arc<dyn Factory>,
    pub descriptor: Descriptor,
    pub value: ParamValue,
}

impl Case {
    /// Parameterized part of the name.
    pub fn name(&self) -> String {
        naming::case_name(&self.descriptor, self.value.tag(), &self.value.to_string())
    }

    /// `<Suite>/<Suite>.<Test>/<name>`
    pub fn full_name(&self) -> String {
        let suite = self.value.suite();
        format!("{suite}/{suite}.{}/{}", self.value.test(), self.name())
    }

    pub fn run(&self, common: &OpenParameters) -> CaseOutcome {
        let start = Instant::now();
        let mut t = Expectations::new();
        let mut fixture = EffectFixture::new(self.factory.clone(), self.descriptor.clone());

        let aborted = self.body(&mut fixture, &mut t, common).is_err();
        fixture.tear_down(&mut t);

        CaseOutcome {
            failures: t.failures().to_vec(),
            aborted,
            final_state: fixture.state(),
            duration: start.elapsed(),
        }
    }

    fn body(
        &self,
        fixture: &mut EffectFixture,
        t: &mut Expectations,
        common: &OpenParameters,
    ) -> Result<(), Abort> {
        let effect = fixture.create(t)?;
        let default = Specific::NoiseSuppression(NoiseSuppression::Level(Level::Medium));
        fixture.open(t, common, Some(&default))?;

        let descriptor = t.assert_ok(effect.descriptor(), "descriptor")?;
        let ns = self.value.to_noise_suppression();
        let expected = if descriptor.capability.accepts(&ns) {
            ExceptionCode::None
        } else {
            ExceptionCode::IllegalArgument
        };
        let param = Parameter::noise_suppression(ns);

        let set = effect.set_parameter(&param);
        t.expect_status(expected, &set, "set_parameter");
        if set.is_err() {
            fixture.mark(CaseState::Skipped);
            return Ok(());
        }
        fixture.mark(CaseState::ParamSet);

        let get = effect.get_parameter(&param.id());
        if t.expect_status(ExceptionCode::None, &get, "get_parameter") {
            if let Ok(got) = get {
                if t.expect_eq(&param, &got, "get_parameter") {
                    fixture.mark(CaseState::ParamVerified);
                }
            }
        }
        Ok(())
    }
}

/// Result of one case.
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub failures: Vec<String>,
    /// An assertion ended the case body early.
    pub aborted: bool,
    pub final_state: CaseState,
    pub duration: Duration,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Cross-join discovered implementations with every value under test,
/// grouped by suite so each suite's cases run together.
pub fn cross_join(found: &[(Arc<dyn Factory>, Descriptor)]) -> Vec<Case> {
    let mut cases = Vec::new();
    for values in ParamValue::suites() {
        for (factory, descriptor) in found {
            for value in &values {
                cases.push(Case {
                    factory: factory.clone(),
                    descriptor: descriptor.clone(),
                    value: *value,
                });
            }
        }
    }
    cases
}
