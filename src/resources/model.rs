use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use crate::physics::{ModelError, SimulationModel};

#[derive(Debug, Default)]
struct LeaseState {
    leases: usize,
    /// Set when a lease performed the load, so the last lease unloads.
    loaded_by_us: bool,
}

/// Reference-counted access to a shared simulation model.
///
/// The first lease loads the model unless something else already has; the
/// last lease unloads it only if a lease did the loading. A model loaded
/// elsewhere is never unloaded from here.
pub struct ModelHandle<M: SimulationModel> {
    model: M,
    state: Mutex<LeaseState>,
}

impl<M: SimulationModel> ModelHandle<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            state: Mutex::new(LeaseState::default()),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn active_leases(&self) -> usize {
        self.lock().leases
    }

    /// Take a lease, loading the model if this is the first one and it is
    /// not already loaded. The model stays available until every lease is
    /// dropped.
    pub fn acquire(&self) -> Result<ModelLease<'_, M>, ModelError> {
        let mut state = self.lock();
        if state.leases == 0 {
            if self.model.is_loaded() {
                debug!("Model '{}' already loaded, leasing", self.model.name());
                state.loaded_by_us = false;
            } else {
                self.model.load()?;
                info!("Loaded model '{}'", self.model.name());
                state.loaded_by_us = true;
            }
        }
        state.leases += 1;
        Ok(ModelLease { handle: self })
    }

    fn release(&self) {
        let mut state = self.lock();
        state.leases = state.leases.saturating_sub(1);
        if state.leases == 0 && state.loaded_by_us {
            self.model.unload();
            state.loaded_by_us = false;
            info!("Unloaded model '{}'", self.model.name());
        }
    }

    // A panic while holding the lock leaves the counters consistent, so the
    // poisoned guard is still usable.
    fn lock(&self) -> MutexGuard<'_, LeaseState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Scoped model access. Dropping the lease releases it.
#[must_use = "the model is released as soon as the lease is dropped"]
pub struct ModelLease<'a, M: SimulationModel> {
    handle: &'a ModelHandle<M>,
}

impl<M: SimulationModel> ModelLease<'_, M> {
    pub fn model(&self) -> &M {
        &self.handle.model
    }
}

impl<M: SimulationModel> Drop for ModelLease<'_, M> {
    fn drop(&mut self) {
        self.handle.release();
    }
}
