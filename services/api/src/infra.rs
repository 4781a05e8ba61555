use metrics_exporter_prometheus::PrometheusHandle;
use sheaf::media::{MediaError, MediaStore};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Map-backed media store for the demo command and route tests. The served
/// binary writes through the filesystem store instead.
#[derive(Default, Clone)]
pub(crate) struct MemoryMediaStore {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MediaStore for MemoryMediaStore {
    fn store(&self, path: &str, bytes: &[u8]) -> Result<(), MediaError> {
        let mut guard = self.objects.lock().expect("media mutex poisoned");
        guard.insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, MediaError> {
        let guard = self.objects.lock().expect("media mutex poisoned");
        guard
            .get(path)
            .cloned()
            .ok_or_else(|| MediaError::NotFound(path.to_string()))
    }

    fn remove(&self, path: &str) -> Result<(), MediaError> {
        let mut guard = self.objects.lock().expect("media mutex poisoned");
        guard
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| MediaError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> Result<bool, MediaError> {
        let guard = self.objects.lock().expect("media mutex poisoned");
        Ok(guard.contains_key(path))
    }
}
