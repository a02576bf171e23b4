//! Plugin interface for audio effects.
//!
//! Every call on a [`Factory`] or an [`Effect`] returns a [`Status`] on failure,
//! carrying the exception code the implementation raised. The types here are
//! what travels across the interface: descriptors, the parameter union, and the
//! session parameters used to open an effect.

pub mod config;
pub mod descriptor;
pub mod effect;
pub mod noise_suppression;
pub mod parameter;
pub mod status;

pub use config::{AudioConfig, OpenParameters};
pub use descriptor::{Capability, Descriptor};
pub use effect::{CommandId, Effect, Factory, State};
pub use parameter::{CommonParameter, CommonTag, Parameter, ParameterId, Specific};
pub use status::{code_of, ExceptionCode, Status};

pub use uuid::Uuid;

pub type Result<T> = std::result::Result<T, Status>;
