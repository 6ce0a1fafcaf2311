//! Process-facing surface of the managed bridge: one backend registry and
//! remote handles for objects living inside the managed runtime.

mod instance;
mod registry;

pub use instance::RemoteInstance;
pub use registry::BackendRegistry;

pub use api::{calls, ManagedBackend, MethodResult, ReturnKind};
