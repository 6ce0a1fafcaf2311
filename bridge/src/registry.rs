use api::{calls, ManagedBackend, MethodResult};
use log::{error, info};
use std::sync::{Arc, Mutex, RwLock};

/// Holds the process's single active managed backend.
///
/// The registry stores a shared reference, not the backend itself:
/// replacing the active backend does not tear the previous one down; that
/// stays the caller's job.
pub struct BackendRegistry {
    backend: RwLock<Option<Arc<Mutex<dyn ManagedBackend>>>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            backend: RwLock::new(None),
        }
    }

    /// Store `backend` as the active backend, then initialize it.
    pub fn load_backend(&self, backend: Arc<Mutex<dyn ManagedBackend>>) {
        *self.backend.write().unwrap() = Some(backend.clone());
        backend.lock().unwrap().initialize();
        info!("Managed backend loaded");
    }

    /// The active backend, if any.
    pub fn backend(&self) -> Option<Arc<Mutex<dyn ManagedBackend>>> {
        self.backend.read().unwrap().clone()
    }

    pub fn is_backend_loaded(&self) -> bool {
        self.backend.read().unwrap().is_some()
    }

    /// Run an encoded call on the active backend.
    ///
    /// With no backend loaded this logs and returns [`MethodResult::None`].
    pub fn run_method(&self, call: &str) -> MethodResult {
        // The slot lock is released before the call; a concurrent
        // replacement affects later calls only.
        let backend = self.backend.read().unwrap().clone();
        match backend {
            Some(backend) => backend.lock().unwrap().run_method(call),
            None => {
                error!("No managed backend loaded; unable to run method: {}", call);
                MethodResult::None
            }
        }
    }

    /// Ask the managed side to load an assembly. Silent no-op without a
    /// backend.
    pub fn load_assembly(&self, assembly_path: &str) {
        let backend = self.backend.read().unwrap().clone();
        if let Some(backend) = backend {
            backend
                .lock()
                .unwrap()
                .run_method(&calls::load_assembly(assembly_path));
        }
    }

    /// Ask the managed side to unload an assembly. Silent no-op without a
    /// backend.
    pub fn unload_assembly(&self, assembly_path: &str) {
        let backend = self.backend.read().unwrap().clone();
        if let Some(backend) = backend {
            backend
                .lock()
                .unwrap()
                .run_method(&calls::unload_assembly(assembly_path));
        }
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}
