use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use hush_hal::noise_suppression::{Capability, Level, Type, TYPE_UUID};
use hush_hal::{Descriptor, Effect, Factory, State, Status};

use crate::software::NoiseSuppressionSw;

pub const IMPLEMENTOR: &str = "The Hush Project";

/// Full software implementation: every level, both types.
pub const SOFTWARE_UUID: Uuid = Uuid::from_u128(0xc06c8400_8e06_11e0_9cb6_0002a5d5c51b);
/// Reduced implementation for constrained targets.
pub const LITE_UUID: Uuid = Uuid::from_u128(0xc06c8400_8e06_11e0_9cb6_0002a5d5c51c);

pub fn software_descriptor() -> Descriptor {
    Descriptor::new(TYPE_UUID, SOFTWARE_UUID, IMPLEMENTOR, "NoiseSuppressionSw")
}

pub fn lite_descriptor() -> Descriptor {
    Descriptor::new(TYPE_UUID, LITE_UUID, IMPLEMENTOR, "NoiseSuppressionLite").with_capability(
        Capability {
            min_level: Level::Low,
            max_level: Level::Medium,
            types: vec![Type::SingleChannel],
        },
    )
}

/// Hosts the software noise-suppression implementations and tracks the
/// instances it handed out.
pub struct SoftwareFactory {
    descriptors: Vec<Descriptor>,
    instances: Mutex<Vec<Arc<dyn Effect>>>,
}

impl SoftwareFactory {
    pub fn new() -> Self {
        Self::with_descriptors(vec![software_descriptor(), lite_descriptor()])
    }

    pub fn with_descriptors(descriptors: Vec<Descriptor>) -> Self {
        Self { descriptors, instances: Mutex::new(Vec::new()) }
    }

    /// Instances created and not yet destroyed.
    pub fn live_instances(&self) -> usize {
        self.instances.lock().len()
    }
}

impl Default for SoftwareFactory {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn same_instance(a: &Arc<dyn Effect>, b: &Arc<dyn Effect>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const u8, Arc::as_ptr(b) as *const u8)
}

impl Factory for SoftwareFactory {
    fn query_effects(
        &self,
        type_uuid: Option<&Uuid>,
        uuid: Option<&Uuid>,
    ) -> hush_hal::Result<Vec<Descriptor>> {
        Ok(self
            .descriptors
            .iter()
            .filter(|d| type_uuid.map_or(true, |t| &d.type_uuid == t))
            .filter(|d| uuid.map_or(true, |u| &d.uuid == u))
            .cloned()
            .collect())
    }

    fn create_effect(&self, uuid: &Uuid) -> hush_hal::Result<Option<Arc<dyn Effect>>> {
        let descriptor = self
            .descriptors
            .iter()
            .find(|d| &d.uuid == uuid)
            .ok_or_else(|| Status::illegal_argument(format!("no implementation {uuid}")))?;

        let effect: Arc<dyn Effect> = Arc::new(NoiseSuppressionSw::new(descriptor.clone()));
        let mut instances = self.instances.lock();
        instances.push(effect.clone());
        info!(name = %descriptor.name, %uuid, live = instances.len(), "created effect");
        Ok(Some(effect))
    }

    fn destroy_effect(&self, handle: &Arc<dyn Effect>) -> hush_hal::Result<()> {
        let mut instances = self.instances.lock();
        let pos = instances
            .iter()
            .position(|e| same_instance(e, handle))
            .ok_or_else(|| Status::illegal_argument("unknown effect handle"))?;

        let state = handle.state()?;
        if state != State::Init {
            return Err(Status::illegal_state(format!("destroy in state {state}")));
        }
        instances.swap_remove(pos);
        debug!(live = instances.len(), "destroyed effect");
        Ok(())
    }
}
