use flyer_trim::{ModelError, SimulationModel};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Simulation model that records how often it was loaded and unloaded.
#[derive(Debug, Default)]
pub struct CountingModel {
    loaded: AtomicBool,
    loads: AtomicUsize,
    unloads: AtomicUsize,
    fail_load: bool,
}

impl CountingModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Already loaded by someone else before any trim runs.
    pub fn preloaded() -> Self {
        Self {
            loaded: AtomicBool::new(true),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_load: true,
            ..Self::default()
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn unloads(&self) -> usize {
        self.unloads.load(Ordering::SeqCst)
    }
}

impl SimulationModel for CountingModel {
    fn name(&self) -> &str {
        "reference_uav"
    }

    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    fn load(&self) -> Result<(), ModelError> {
        if self.fail_load {
            return Err(ModelError::LoadFailed {
                name: self.name().to_string(),
                reason: "model file missing".to_string(),
            });
        }
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.loaded.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn unload(&self) {
        self.unloads.fetch_add(1, Ordering::SeqCst);
        self.loaded.store(false, Ordering::SeqCst);
    }
}
