//! Noise-suppression specific parameters.

use uuid::Uuid;

/// Effect type shared by every noise-suppression implementation.
pub const TYPE_UUID: Uuid = Uuid::from_u128(0x58b4b260_8e06_11e0_aa8e_0002a5d5c51b);

/// Suppression strength.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    strum::Display,
    strum::EnumIter,
)]
#[repr(i32)]
pub enum Level {
    #[strum(serialize = "LOW")]
    Low = 0,
    #[strum(serialize = "MEDIUM")]
    #[default]
    Medium = 1,
    #[strum(serialize = "HIGH")]
    High = 2,
}

impl Level {
    /// Largest attenuation applied to signal below the noise floor.
    pub fn max_attenuation_db(self) -> f32 {
        match self {
            Level::Low => 6.0,
            Level::Medium => 10.0,
            Level::High => 15.0,
        }
    }
}

/// Whether suppression runs per channel or on the mixed signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumIter)]
#[repr(i32)]
pub enum Type {
    #[strum(serialize = "SINGLE_CHANNEL")]
    #[default]
    SingleChannel = 0,
    #[strum(serialize = "MULTI_CHANNEL")]
    MultiChannel = 1,
}

/// Noise-suppression member of the parameter union.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoiseSuppression {
    Level(Level),
    Type(Type),
    VendorExtension(Vec<u8>),
}

impl NoiseSuppression {
    pub fn tag(&self) -> NoiseSuppressionTag {
        match self {
            NoiseSuppression::Level(_) => NoiseSuppressionTag::Level,
            NoiseSuppression::Type(_) => NoiseSuppressionTag::Type,
            NoiseSuppression::VendorExtension(_) => NoiseSuppressionTag::VendorExtension,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum NoiseSuppressionTag {
    #[strum(serialize = "level")]
    Level,
    #[strum(serialize = "type")]
    Type,
    #[strum(serialize = "vendor")]
    VendorExtension,
}

/// Values an implementation accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capability {
    pub min_level: Level,
    pub max_level: Level,
    pub types: Vec<Type>,
}

impl Capability {
    pub fn full() -> Self {
        Self {
            min_level: Level::Low,
            max_level: Level::High,
            types: vec![Type::SingleChannel, Type::MultiChannel],
        }
    }

    /// Whether `param` is inside the advertised ranges.
    pub fn accepts(&self, param: &NoiseSuppression) -> bool {
        match param {
            NoiseSuppression::Level(level) => (self.min_level..=self.max_level).contains(level),
            NoiseSuppression::Type(ty) => self.types.contains(ty),
            NoiseSuppression::VendorExtension(_) => false,
        }
    }
}

impl Default for Capability {
    fn default() -> Self {
        Self::full()
    }
}
