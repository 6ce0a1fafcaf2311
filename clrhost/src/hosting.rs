//! Runtime bootstrap (hostfxr discovery and loading) and host context setup.

use crate::ffi::{
    GetHostfxrPathFn, HostChar, HostfxrCloseFn, HostfxrGetRuntimeDelegateFn, HostfxrHandle,
    HostfxrInitializeForRuntimeConfigFn, LoadAssemblyAndGetFunctionPointerFn,
    HDT_LOAD_ASSEMBLY_AND_GET_FUNCTION_POINTER, HOSTFXR_PATH_CAPACITY,
};
use crate::loader;
use crate::marshal::{path_from_buffer, HostString};
use crate::HostError;
use libloading::Library;
use log::{debug, error, info};
use std::mem;
use std::os::raw::c_void;
use std::path::{Path, PathBuf};
use std::ptr;

/// The three hostfxr control functions, resolved once per process.
///
/// Keeps the nethost and hostfxr libraries loaded so the pointers stay
/// valid; they are released at process teardown only.
#[derive(Debug)]
pub struct HostFxr {
    pub(crate) init_for_config: HostfxrInitializeForRuntimeConfigFn,
    pub(crate) get_runtime_delegate: HostfxrGetRuntimeDelegateFn,
    pub(crate) close: HostfxrCloseFn,
    pub(crate) _libs: Vec<Library>,
}

impl HostFxr {
    /// Locate hostfxr through nethost and resolve its control functions.
    ///
    /// Fails closed: either all three functions resolve or nothing of the
    /// bootstrap is retained.
    pub fn load() -> Result<Self, HostError> {
        let (hostfxr_path, nethost) = locate_hostfxr()?;
        info!("Loading hostfxr from {:?}", hostfxr_path);
        let hostfxr = loader::load_library(&hostfxr_path)?;
        unsafe {
            let init_for_config =
                loader::resolve(&hostfxr, "hostfxr", b"hostfxr_initialize_for_runtime_config\0")?;
            let get_runtime_delegate =
                loader::resolve(&hostfxr, "hostfxr", b"hostfxr_get_runtime_delegate\0")?;
            let close = loader::resolve(&hostfxr, "hostfxr", b"hostfxr_close\0")?;
            Ok(Self {
                init_for_config,
                get_runtime_delegate,
                close,
                _libs: vec![nethost, hostfxr],
            })
        }
    }
}

/// Name of the nethost library on this platform.
fn nethost_library_name() -> &'static str {
    if cfg!(windows) {
        "nethost.dll"
    } else if cfg!(target_os = "macos") {
        "libnethost.dylib"
    } else {
        "libnethost.so"
    }
}

/// Places searched for nethost: next to the loader module first, then the
/// system loader path.
fn nethost_candidates() -> Vec<PathBuf> {
    let name = nethost_library_name();
    let mut candidates = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.join(name));
        }
    }
    candidates.push(PathBuf::from(name));
    candidates
}

/// Ask nethost where hostfxr lives.
fn locate_hostfxr() -> Result<(PathBuf, Library), HostError> {
    let candidates = nethost_candidates();
    let mut nethost = None;
    for path in &candidates {
        if let Some(lib) = loader::probe(path) {
            nethost = Some(lib);
            break;
        }
    }
    let nethost = match nethost {
        Some(lib) => lib,
        None => {
            error!("nethost not found (tried {:?})", candidates);
            return Err(HostError::LoadFailure {
                path: PathBuf::from(nethost_library_name()),
                reason: "not found next to the loader module or on the system path".to_string(),
            });
        }
    };

    let mut buffer = [0 as HostChar; HOSTFXR_PATH_CAPACITY];
    let mut size = buffer.len();
    let rc = unsafe {
        let get_hostfxr_path: GetHostfxrPathFn =
            loader::resolve(&nethost, "nethost", b"get_hostfxr_path\0")?;
        get_hostfxr_path(buffer.as_mut_ptr(), &mut size, ptr::null())
    };
    if rc != 0 {
        error!("get_hostfxr_path failed with status {:#010x}", rc as u32);
        return Err(HostError::Discovery { status: rc as u32 });
    }
    Ok((path_from_buffer(&buffer), nethost))
}

/// An initialized runtime host paired with its load-assembly delegate.
///
/// At most one context exists per process. It is never closed on the happy
/// path; the OS reclaims it at process teardown.
#[derive(Debug)]
pub struct HostContext {
    pub(crate) handle: HostfxrHandle,
    pub(crate) load_assembly: LoadAssemblyAndGetFunctionPointerFn,
    pub(crate) _fxr: HostFxr,
}

// SAFETY: The handle and delegate are only used behind &mut self, and
// hostfxr does not pin them to the creating thread.
unsafe impl Send for HostContext {}

impl HostContext {
    /// Stand up a runtime host from `runtime_config` and resolve the
    /// load-assembly delegate.
    ///
    /// If the delegate cannot be obtained, the freshly created host is
    /// closed before the error returns; this is the only place
    /// `hostfxr_close` runs.
    pub fn initialize(fxr: HostFxr, runtime_config: &Path) -> Result<Self, HostError> {
        let config = HostString::from_path(runtime_config)?;

        let mut handle: HostfxrHandle = ptr::null_mut();
        let rc = unsafe { (fxr.init_for_config)(config.as_ptr(), ptr::null(), &mut handle) };
        if rc != 0 || handle.is_null() {
            error!(
                "Runtime host initialization failed for {:?} (status {:#010x})",
                runtime_config, rc as u32
            );
            return Err(HostError::HostInit { status: rc as u32 });
        }
        debug!("Runtime host initialized from {:?}", runtime_config);

        let mut delegate: *mut c_void = ptr::null_mut();
        let rc = unsafe {
            (fxr.get_runtime_delegate)(
                handle,
                HDT_LOAD_ASSEMBLY_AND_GET_FUNCTION_POINTER,
                &mut delegate,
            )
        };
        if rc != 0 || delegate.is_null() {
            error!(
                "Failed to obtain the load-assembly delegate (status {:#010x})",
                rc as u32
            );
            // The host was created above; release it before reporting.
            unsafe { (fxr.close)(handle) };
            return Err(HostError::DelegateResolution { status: rc as u32 });
        }

        let load_assembly =
            unsafe { mem::transmute::<*mut c_void, LoadAssemblyAndGetFunctionPointerFn>(delegate) };
        Ok(Self {
            handle,
            load_assembly,
            _fxr: fxr,
        })
    }

    /// Raw hostfxr handle of this context.
    pub fn handle(&self) -> HostfxrHandle {
        self.handle
    }
}
