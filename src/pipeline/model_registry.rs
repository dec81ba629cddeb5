use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelKey {
    pub model: String,
    pub device: String,
}

impl ModelKey {
    pub fn new(model: impl Into<String>, device: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            device: device.into(),
        }
    }
}

type Slot<H> = Arc<Mutex<Option<Arc<H>>>>;

/// Process-wide cache of recognizer handles, one per `(model, device)`.
///
/// Each key has its own slot lock. Callers asking for the same key wait for a
/// single load and share the handle; loads for different keys run in
/// parallel. A loader that fails or panics leaves its slot empty and the next
/// caller retries.
pub struct ModelRegistry<H> {
    slots: Mutex<HashMap<ModelKey, Slot<H>>>,
}

impl<H> Default for ModelRegistry<H> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<H> ModelRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load<F>(&self, key: &ModelKey, load: F) -> Result<Arc<H>, PipelineError>
    where
        F: FnOnce(&ModelKey) -> Result<H, PipelineError>,
    {
        // The map lock only guards slot lookup; a poisoned map is still consistent.
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key.clone()).or_default())
        };

        // A panicking loader poisons the slot but never fills it.
        let mut loaded = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = loaded.as_ref() {
            return Ok(Arc::clone(handle));
        }

        tracing::info!(
            model = key.model.as_str(),
            device = key.device.as_str(),
            "model registry: loading recognizer"
        );
        let handle = Arc::new(load(key)?);
        *loaded = Some(Arc::clone(&handle));
        Ok(handle)
    }

    /// Number of loaded handles. Waits for loads already in flight.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .values()
            .filter(|slot| slot.lock().unwrap_or_else(PoisonError::into_inner).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
