use uuid::Uuid;

pub use crate::noise_suppression::Capability;

/// Static metadata identifying one effect implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Descriptor {
    pub type_uuid: Uuid,
    pub uuid: Uuid,
    pub implementor: String,
    pub name: String,
    pub capability: Capability,
}

impl Descriptor {
    pub fn new(
        type_uuid: Uuid,
        uuid: Uuid,
        implementor: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            type_uuid,
            uuid,
            implementor: implementor.into(),
            name: name.into(),
            capability: Capability::default(),
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capability = capability;
        self
    }
}
