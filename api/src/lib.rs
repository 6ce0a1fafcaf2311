pub mod calls;
mod value;

pub use value::{MethodResult, MethodReturnValue, ReturnKind};

/// Capability surface of a loaded managed-runtime backend.
///
/// At most one backend is active per process. Callers keep ownership and
/// hand out shared references; every operation is synchronous and blocks the
/// calling thread for the duration of the managed call.
pub trait ManagedBackend: Send {
    /// Bring the runtime up. Idempotent: calling it on an initialized
    /// backend logs and returns without side effects.
    fn initialize(&mut self);

    fn is_initialized(&self) -> bool;

    /// Dispatch an encoded call (see [`calls`]) into the managed runtime.
    ///
    /// Never panics and never surfaces an error: every failure is logged
    /// and collapsed to [`MethodResult::None`].
    fn run_method(&mut self, call: &str) -> MethodResult;
}
