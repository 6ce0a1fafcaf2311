use crate::registry::BackendRegistry;
use api::{calls, MethodResult};
use log::debug;
use std::sync::Arc;

/// Native handle to an object living inside the managed runtime.
///
/// Construction asks the managed factory for an instance and keeps its
/// numeric id; dropping always issues the delete call exactly once, even
/// when the id is 0 because creation failed. Create and delete stay paired;
/// filtering out unknown ids is the managed side's concern.
pub struct RemoteInstance {
    registry: Arc<BackendRegistry>,
    instance_id: u32,
}

impl RemoteInstance {
    /// Ask the managed factory for a new instance of `type_namespace`.
    ///
    /// The reply's unsigned field becomes the id, whatever kind the reply
    /// actually was.
    pub fn create(registry: &Arc<BackendRegistry>, type_namespace: &str) -> Self {
        let reply = registry.run_method(&calls::create_instance(type_namespace));
        let instance_id = reply.uint_result();
        debug!("Created remote instance {} of {}", instance_id, type_namespace);
        Self {
            registry: Arc::clone(registry),
            instance_id,
        }
    }

    /// Identifier assigned by the managed factory (0 when creation failed).
    pub fn instance_id(&self) -> u32 {
        self.instance_id
    }

    /// Run a method on this instance.
    pub fn run_method(&self, method: &str) -> MethodResult {
        self.registry
            .run_method(&calls::run_instance_method(self.instance_id, method))
    }
}

impl Drop for RemoteInstance {
    fn drop(&mut self) {
        self.registry
            .run_method(&calls::delete_instance(self.instance_id));
    }
}
