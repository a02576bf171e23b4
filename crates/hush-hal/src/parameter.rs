use crate::config::AudioConfig;
use crate::noise_suppression::{NoiseSuppression, NoiseSuppressionTag};

/// Effect-specific member of the parameter union.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Specific {
    NoiseSuppression(NoiseSuppression),
}

/// Parameters shared by every effect type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommonParameter {
    Input(AudioConfig),
    Output(AudioConfig),
    Session(i32),
    IoHandle(i32),
}

impl CommonParameter {
    pub fn tag(&self) -> CommonTag {
        match self {
            CommonParameter::Input(_) => CommonTag::Input,
            CommonParameter::Output(_) => CommonTag::Output,
            CommonParameter::Session(_) => CommonTag::Session,
            CommonParameter::IoHandle(_) => CommonTag::IoHandle,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommonTag {
    Input,
    Output,
    Session,
    IoHandle,
}

/// Value passed to `set_parameter` and returned by `get_parameter`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Parameter {
    Common(CommonParameter),
    Specific(Specific),
}

impl Parameter {
    pub fn noise_suppression(ns: NoiseSuppression) -> Self {
        Parameter::Specific(Specific::NoiseSuppression(ns))
    }

    /// Id that reads back the field this parameter writes.
    pub fn id(&self) -> ParameterId {
        match self {
            Parameter::Common(common) => ParameterId::Common(common.tag()),
            Parameter::Specific(Specific::NoiseSuppression(ns)) => {
                ParameterId::NoiseSuppression(ns.tag())
            }
        }
    }
}

/// Tag selecting which field of the union `get_parameter` returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParameterId {
    Common(CommonTag),
    NoiseSuppression(NoiseSuppressionTag),
}
