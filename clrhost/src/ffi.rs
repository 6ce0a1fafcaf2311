//! C ABI surface of nethost, hostfxr and the coreclr dispatch delegate.

use std::os::raw::c_void;

/// Character type of the hosting API: UTF-16 on Windows, UTF-8 elsewhere.
#[cfg(windows)]
pub type HostChar = u16;
#[cfg(not(windows))]
pub type HostChar = std::os::raw::c_char;

/// Opaque handle to an initialized runtime host.
pub type HostfxrHandle = *mut c_void;

// nethost and the coreclr delegates use the stdcall convention on Windows,
// the hostfxr exports use cdecl; both collapse to plain C elsewhere.

pub type GetHostfxrPathFn = unsafe extern "system" fn(
    buffer: *mut HostChar,
    buffer_size: *mut usize,
    parameters: *const c_void,
) -> i32;

pub type HostfxrInitializeForRuntimeConfigFn = unsafe extern "C" fn(
    runtime_config_path: *const HostChar,
    parameters: *const c_void,
    host_context_handle: *mut HostfxrHandle,
) -> i32;

pub type HostfxrGetRuntimeDelegateFn = unsafe extern "C" fn(
    host_context_handle: HostfxrHandle,
    kind: i32,
    delegate: *mut *mut c_void,
) -> i32;

pub type HostfxrCloseFn = unsafe extern "C" fn(host_context_handle: HostfxrHandle) -> i32;

/// `load_assembly_and_get_function_pointer`, obtained through
/// `hostfxr_get_runtime_delegate`.
pub type LoadAssemblyAndGetFunctionPointerFn = unsafe extern "system" fn(
    assembly_path: *const HostChar,
    type_name: *const HostChar,
    method_name: *const HostChar,
    delegate_type_name: *const HostChar,
    reserved: *mut c_void,
    delegate: *mut *mut c_void,
) -> i32;

/// Shape of the managed `RunMethod` entry point: a request string in, a
/// fixed-layout result slot out. Declared with an unwinding ABI so a fault
/// can be caught at the dispatch boundary instead of aborting the process.
pub type ManagedEntryFn =
    unsafe extern "system-unwind" fn(request: *const c_void, result: *mut c_void);

/// Delegate kind selecting `load_assembly_and_get_function_pointer`.
pub const HDT_LOAD_ASSEMBLY_AND_GET_FUNCTION_POINTER: i32 = 5;

/// Sentinel passed in place of a delegate type name to resolve
/// `UnmanagedCallersOnly` methods (the C definition is `(char_t*)-1`).
pub const UNMANAGED_CALLERS_ONLY_METHOD: *const HostChar = usize::MAX as *const HostChar;

/// Buffer length handed to `get_hostfxr_path`, sized to the MAX_PATH
/// contract. A longer install path fails discovery rather than retrying.
pub const HOSTFXR_PATH_CAPACITY: usize = 260;
