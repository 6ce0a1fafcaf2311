//! The hostfxr-backed [`ManagedBackend`] implementation.

use crate::config::HostConfig;
use crate::dispatch::MethodDispatcher;
use crate::hosting::{HostContext, HostFxr};
use crate::HostError;
use api::{ManagedBackend, MethodResult};
use log::{error, info};
use once_cell::sync::OnceCell;

static BACKEND_CLAIMED: OnceCell<()> = OnceCell::new();

/// Hosts the managed bridge runtime behind the [`ManagedBackend`] trait.
///
/// Only one backend can ever be constructed in a process: the runtime host,
/// once created, cannot be torn down and recreated. Construction claims a
/// process-wide slot and every later attempt is refused.
pub struct DotnetBackend {
    config: HostConfig,
    dispatcher: Option<MethodDispatcher>,
    initialized: bool,
}

impl DotnetBackend {
    /// Backend for the standard bridge layout next to the loader module.
    pub fn new() -> Result<Self, HostError> {
        Self::with_config(HostConfig::from_loader_module()?)
    }

    /// Backend with an explicit layout.
    ///
    /// Fails with [`HostError::AlreadyActive`] if a backend was already
    /// constructed in this process.
    pub fn with_config(config: HostConfig) -> Result<Self, HostError> {
        BACKEND_CLAIMED
            .set(())
            .map_err(|_| HostError::AlreadyActive)?;
        Ok(Self {
            config,
            dispatcher: None,
            initialized: false,
        })
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Stand up the host and dispatcher from already-resolved control
    /// functions. On any failure the backend stays uninitialized.
    fn initialize_with(&mut self, fxr: HostFxr) {
        let context = match HostContext::initialize(fxr, &self.config.config_path) {
            Ok(context) => context,
            Err(e) => {
                error!("Backend initialization aborted: {}", e);
                return;
            }
        };

        self.dispatcher = Some(MethodDispatcher::new(
            context,
            self.config.assembly_path.clone(),
        ));
        self.initialized = true;
        info!(
            "Dotnet backend initialized from {:?}",
            self.config.assembly_path
        );
    }
}

impl ManagedBackend for DotnetBackend {
    fn initialize(&mut self) {
        if self.initialized {
            info!("Dotnet backend already initialized");
            return;
        }

        let fxr = match HostFxr::load() {
            Ok(fxr) => fxr,
            Err(e) => {
                error!("Backend initialization aborted: {}", e);
                return;
            }
        };
        self.initialize_with(fxr);
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn run_method(&mut self, call: &str) -> MethodResult {
        let dispatcher = match self.dispatcher.as_mut() {
            Some(dispatcher) => dispatcher,
            None => {
                error!("{}; dropping call: {}", HostError::NotInitialized, call);
                return MethodResult::None;
            }
        };
        match dispatcher.run(call) {
            Ok(result) => result,
            Err(e) => {
                error!("{}; call was: {}", e, call);
                MethodResult::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::{HostChar, HostfxrHandle};
    use std::os::raw::c_void;
    use std::path::Path;
    use std::sync::atomic::{AtomicU32, Ordering};

    const BAD_STATUS: i32 = 0x8000_8016u32 as i32;

    unsafe extern "C" fn init_ok(
        _config: *const HostChar,
        _params: *const c_void,
        handle: *mut HostfxrHandle,
    ) -> i32 {
        *handle = 0x30usize as HostfxrHandle;
        0
    }

    unsafe extern "C" fn delegate_fails(
        _handle: HostfxrHandle,
        _kind: i32,
        _delegate: *mut *mut c_void,
    ) -> i32 {
        BAD_STATUS
    }

    static CLOSE_COUNT: AtomicU32 = AtomicU32::new(0);

    unsafe extern "C" fn close_counting(_handle: HostfxrHandle) -> i32 {
        CLOSE_COUNT.fetch_add(1, Ordering::SeqCst);
        0
    }

    #[test]
    fn test_delegate_failure_leaves_backend_uninitialized() {
        // Built directly so the test does not consume the process-wide
        // construction slot.
        let mut backend = DotnetBackend {
            config: HostConfig::from_dir(Path::new("/opt/game")),
            dispatcher: None,
            initialized: false,
        };
        let fxr = HostFxr {
            init_for_config: init_ok,
            get_runtime_delegate: delegate_fails,
            close: close_counting,
            _libs: Vec::new(),
        };

        backend.initialize_with(fxr);

        // The half-created host was closed, no dispatcher was kept, and
        // calls on the same backend keep reporting the uniform failure
        // value.
        assert!(!backend.is_initialized());
        assert_eq!(CLOSE_COUNT.load(Ordering::SeqCst), 1);
        assert!(backend.run_method("Bridge.Methods.GetVersion()").is_none());
    }

    // The construction latch is process-wide, so the whole lifecycle runs in
    // one test.
    #[test]
    fn test_backend_lifecycle_and_process_latch() {
        let _ = env_logger::builder().is_test(true).try_init();

        let dir = tempfile::tempdir().unwrap();
        let config = HostConfig::from_dir(dir.path());
        let mut backend = DotnetBackend::with_config(config.clone()).unwrap();
        assert_eq!(backend.config(), &config);

        // Second construction in the same process is refused, whichever
        // factory it goes through.
        let second = DotnetBackend::with_config(config.clone());
        assert!(matches!(second, Err(HostError::AlreadyActive)));
        assert!(DotnetBackend::new().is_err());

        // Before initialize: uniform failure, no dispatch.
        assert!(!backend.is_initialized());
        assert!(backend.run_method("Bridge.Methods.Ping()").is_none());

        // An empty directory has no runtime descriptor, so initialization
        // fails closed and the backend stays unusable.
        backend.initialize();
        assert!(!backend.is_initialized());
        assert!(backend.run_method("Bridge.Methods.Ping()").is_none());
    }
}
