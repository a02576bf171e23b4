//! Named factory services, the in-process stand-in for a service manager.

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use hush_hal::{Descriptor, Factory};

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// Process-wide registry.
pub fn global() -> &'static Registry {
    &GLOBAL
}

#[derive(Default)]
pub struct Registry {
    services: Mutex<BTreeMap<String, Arc<dyn Factory>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `instance`, replacing any previous holder of the name.
    pub fn register(&self, instance: impl Into<String>, factory: Arc<dyn Factory>) {
        let instance = instance.into();
        if self.services.lock().insert(instance.clone(), factory).is_some() {
            warn!(%instance, "replaced registered factory");
        } else {
            debug!(%instance, "registered factory");
        }
    }

    pub fn unregister(&self, instance: &str) -> Option<Arc<dyn Factory>> {
        self.services.lock().remove(instance)
    }

    pub fn get(&self, instance: &str) -> Option<Arc<dyn Factory>> {
        self.services.lock().get(instance).cloned()
    }

    /// Registered instance names, sorted.
    pub fn instances(&self) -> Vec<String> {
        self.services.lock().keys().cloned().collect()
    }

    /// Every (factory, descriptor) pair advertising `type_uuid`, in instance
    /// name order. Factories whose query fails are skipped.
    pub fn discover(&self, type_uuid: &Uuid) -> Vec<(Arc<dyn Factory>, Descriptor)> {
        // snapshot so factory calls run without the registry lock
        let services: Vec<(String, Arc<dyn Factory>)> =
            self.services.lock().iter().map(|(k, v)| (k.clone(), v.clone())).collect();

        let mut found = Vec::new();
        for (instance, factory) in services {
            match factory.query_effects(Some(type_uuid), None) {
                Ok(descriptors) => {
                    debug!(%instance, count = descriptors.len(), "queried factory");
                    found.extend(descriptors.into_iter().map(|d| (factory.clone(), d)));
                }
                Err(status) => warn!(%instance, %status, "query_effects failed, skipping"),
            }
        }
        found
    }
}
