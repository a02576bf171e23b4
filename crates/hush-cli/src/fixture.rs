use std::sync::Arc;

use hush_hal::{Descriptor, Effect, Factory, OpenParameters, Specific};

use crate::expect::{Abort, Expectations};

/// Where a case got to. Teardown moves any case that created an instance
/// on to `Closed` and `Destroyed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum CaseState {
    Pending,
    Created,
    Opened,
    ParamSet,
    ParamVerified,
    Skipped,
    Closed,
    Destroyed,
}

/// Owns one effect instance for the lifetime of a case.
pub struct EffectFixture {
    factory: Arc<dyn Factory>,
    descriptor: Descriptor,
    effect: Option<Arc<dyn Effect>>,
    opened: bool,
    state: CaseState,
}

impl EffectFixture {
    pub fn new(factory: Arc<dyn Factory>, descriptor: Descriptor) -> Self {
        Self { factory, descriptor, effect: None, opened: false, state: CaseState::Pending }
    }

    pub fn state(&self) -> CaseState {
        self.state
    }

    pub fn mark(&mut self, state: CaseState) {
        self.state = state;
    }

    pub fn create(&mut self, t: &mut Expectations) -> Result<Arc<dyn Effect>, Abort> {
        let created = self.factory.create_effect(&self.descriptor.uuid);
        let created = t.assert_ok(created, "create_effect")?;
        let effect = t.assert_some(created, "create_effect")?;
        self.effect = Some(effect.clone());
        self.state = CaseState::Created;
        Ok(effect)
    }

    pub fn open(
        &mut self,
        t: &mut Expectations,
        common: &OpenParameters,
        specific: Option<&Specific>,
    ) -> Result<(), Abort> {
        let effect = t.assert_some(self.effect.clone(), "open")?;
        t.assert_ok(effect.open(common, specific), "open")?;
        self.opened = true;
        self.state = CaseState::Opened;
        Ok(())
    }

    /// Close (if opened) then destroy (if created). A failed close skips destroy.
    pub fn tear_down(&mut self, t: &mut Expectations) {
        let Some(effect) = self.effect.clone() else {
            return;
        };
        if self.opened {
            if t.assert_ok(effect.close(), "close").is_err() {
                return;
            }
            self.opened = false;
            self.state = CaseState::Closed;
        }
        if t.assert_ok(self.factory.destroy_effect(&effect), "destroy_effect").is_ok() {
            self.effect = None;
            self.state = CaseState::Destroyed;
        }
    }
}
