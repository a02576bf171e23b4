//! Dispatch pool and the proxies that route interface calls through it.
//!
//! Callers block until a pool worker has run the call and replied. The pool
//! size is fixed at start; with one worker every call is serialized.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, error};
use uuid::Uuid;

use hush_hal::{
    CommandId, Descriptor, Effect, Factory, OpenParameters, Parameter, ParameterId, Specific, State,
    Status,
};

use crate::error::{Error, Result};
use crate::factory::same_instance;

type Job = Box<dyn FnOnce() + Send>;

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub max_threads: usize,
}

impl TransportConfig {
    pub const MAX_THREADS: usize = 16;
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { max_threads: 1 }
    }
}

pub struct DispatchPool {
    tx: Mutex<Option<Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl DispatchPool {
    pub fn start(cfg: &TransportConfig) -> Result<Arc<Self>> {
        if cfg.max_threads == 0 || cfg.max_threads > TransportConfig::MAX_THREADS {
            return Err(Error::InvalidThreadCount {
                got: cfg.max_threads,
                max: TransportConfig::MAX_THREADS,
            });
        }
        let (tx, rx) = crossbeam_channel::unbounded::<Job>();
        let mut workers = Vec::with_capacity(cfg.max_threads);
        for i in 0..cfg.max_threads {
            let rx = rx.clone();
            let handle = std::thread::Builder::new()
                .name(format!("hush-dispatch-{i}"))
                .spawn(move || worker_loop(rx))?;
            workers.push(handle);
        }
        debug!(threads = cfg.max_threads, "dispatch pool started");
        Ok(Arc::new(Self { tx: Mutex::new(Some(tx)), workers: Mutex::new(workers) }))
    }

    /// Run `f` on a pool worker and wait for its reply.
    pub fn call<T, F>(&self, f: F) -> hush_hal::Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> hush_hal::Result<T> + Send + 'static,
    {
        let sender = self
            .tx
            .lock()
            .clone()
            .ok_or_else(|| Status::transaction_failed("dispatch pool stopped"))?;
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        sender
            .send(Box::new(move || {
                let _ = reply_tx.send(f());
            }))
            .map_err(|_| Status::transaction_failed("dispatch pool stopped"))?;
        reply_rx
            .recv()
            .map_err(|_| Status::transaction_failed("call dropped without reply"))?
    }

    /// Stop accepting calls and join the workers. Queued calls still run.
    pub fn shutdown(&self) {
        self.tx.lock().take();
        let workers: Vec<_> = self.workers.lock().drain(..).collect();
        let me = std::thread::current().id();
        for w in workers {
            // a worker can't join itself
            if w.thread().id() == me {
                continue;
            }
            if w.join().is_err() {
                error!("dispatch worker panicked");
            }
        }
    }
}

impl Drop for DispatchPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(rx: Receiver<Job>) {
    for job in rx.iter() {
        if let Err(err) = catch_unwind(AssertUnwindSafe(job)) {
            error!("panic during dispatched call: {err:?}");
        }
    }
}

/// Effect proxy whose calls run on a [`DispatchPool`].
pub struct RemoteEffect {
    inner: Arc<dyn Effect>,
    pool: Arc<DispatchPool>,
}

impl RemoteEffect {
    pub fn new(inner: Arc<dyn Effect>, pool: Arc<DispatchPool>) -> Self {
        Self { inner, pool }
    }
}

impl Effect for RemoteEffect {
    fn open(&self, common: &OpenParameters, specific: Option<&Specific>) -> hush_hal::Result<()> {
        let (fx, common, specific) = (self.inner.clone(), common.clone(), specific.cloned());
        self.pool.call(move || fx.open(&common, specific.as_ref()))
    }

    fn close(&self) -> hush_hal::Result<()> {
        let fx = self.inner.clone();
        self.pool.call(move || fx.close())
    }

    fn descriptor(&self) -> hush_hal::Result<Descriptor> {
        let fx = self.inner.clone();
        self.pool.call(move || fx.descriptor())
    }

    fn state(&self) -> hush_hal::Result<State> {
        let fx = self.inner.clone();
        self.pool.call(move || fx.state())
    }

    fn command(&self, command: CommandId) -> hush_hal::Result<()> {
        let fx = self.inner.clone();
        self.pool.call(move || fx.command(command))
    }

    fn set_parameter(&self, param: &Parameter) -> hush_hal::Result<()> {
        let (fx, param) = (self.inner.clone(), param.clone());
        self.pool.call(move || fx.set_parameter(&param))
    }

    fn get_parameter(&self, id: &ParameterId) -> hush_hal::Result<Parameter> {
        let (fx, id) = (self.inner.clone(), *id);
        self.pool.call(move || fx.get_parameter(&id))
    }

    fn process(&self, input: &[f32], output: &mut [f32]) -> hush_hal::Result<usize> {
        let (fx, input, len) = (self.inner.clone(), input.to_vec(), output.len());
        let (written, buf) = self.pool.call(move || {
            let mut buf = vec![0.0f32; len];
            let written = fx.process(&input, &mut buf)?;
            Ok((written, buf))
        })?;
        output[..written].copy_from_slice(&buf[..written]);
        Ok(written)
    }
}

/// Factory proxy handing out [`RemoteEffect`]s.
pub struct RemoteFactory {
    inner: Arc<dyn Factory>,
    pool: Arc<DispatchPool>,
    // (proxy, wrapped instance) for every live effect
    proxies: Mutex<Vec<(Arc<dyn Effect>, Arc<dyn Effect>)>>,
}

impl RemoteFactory {
    pub fn new(inner: Arc<dyn Factory>, pool: Arc<DispatchPool>) -> Self {
        Self { inner, pool, proxies: Mutex::new(Vec::new()) }
    }
}

impl Factory for RemoteFactory {
    fn query_effects(
        &self,
        type_uuid: Option<&Uuid>,
        uuid: Option<&Uuid>,
    ) -> hush_hal::Result<Vec<Descriptor>> {
        let (factory, type_uuid, uuid) = (self.inner.clone(), type_uuid.copied(), uuid.copied());
        self.pool.call(move || factory.query_effects(type_uuid.as_ref(), uuid.as_ref()))
    }

    fn create_effect(&self, uuid: &Uuid) -> hush_hal::Result<Option<Arc<dyn Effect>>> {
        let (factory, uuid) = (self.inner.clone(), *uuid);
        let Some(inner) = self.pool.call(move || factory.create_effect(&uuid))? else {
            return Ok(None);
        };
        let proxy: Arc<dyn Effect> = Arc::new(RemoteEffect::new(inner.clone(), self.pool.clone()));
        self.proxies.lock().push((proxy.clone(), inner));
        Ok(Some(proxy))
    }

    fn destroy_effect(&self, handle: &Arc<dyn Effect>) -> hush_hal::Result<()> {
        let inner = {
            let proxies = self.proxies.lock();
            proxies
                .iter()
                .find(|(proxy, _)| same_instance(proxy, handle))
                .map(|(_, inner)| inner.clone())
                .ok_or_else(|| Status::illegal_argument("unknown effect handle"))?
        };
        let factory = self.inner.clone();
        let target = inner.clone();
        self.pool.call(move || factory.destroy_effect(&target))?;
        self.proxies.lock().retain(|(_, i)| !same_instance(i, &inner));
        Ok(())
    }
}
