//! Software noise-suppression effects and the plumbing that serves them:
//! a factory, a named service registry, and a dispatch pool that routes
//! interface calls to worker threads.

pub mod dsp;
pub mod error;
pub mod factory;
pub mod graph;
pub mod registry;
pub mod software;
pub mod transport;

use std::sync::Arc;

pub use error::{Error, Result};
pub use factory::SoftwareFactory;
pub use registry::Registry;
pub use software::NoiseSuppressionSw;
pub use transport::{DispatchPool, RemoteFactory, TransportConfig};

/// Service name the software factory is published under.
pub const DEFAULT_INSTANCE: &str = "hush.effect.Factory/default";

/// Publish the software factory into `registry`, served through `pool`.
pub fn register_default_services(registry: &Registry, pool: &Arc<DispatchPool>) {
    let factory = Arc::new(SoftwareFactory::new());
    registry.register(DEFAULT_INSTANCE, Arc::new(RemoteFactory::new(factory, pool.clone())));
}
